use serde::{Deserialize, Serialize};
use cr_core::CorrelationToken;

/// Reply for callers that did not ask to wait for the image.
///
/// `client_id` and `correlation_token` carry the same value; `client_id` is
/// the name existing clients read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitAccepted {
    pub status: String,
    pub seed: u64,
    pub client_id: String,
    pub correlation_token: String,
}

impl SubmitAccepted {
    pub fn new(seed: u64, token: &CorrelationToken) -> Self {
        Self {
            status: "accepted".to_string(),
            seed,
            client_id: token.to_string(),
            correlation_token: token.to_string(),
        }
    }
}

/// JSON part of the composite reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMetadata {
    pub status: String,
    pub seed: u64,
    pub client_id: String,
    pub correlation_token: String,
    pub filename: Option<String>,
    pub content_type: String,
}

impl ArtifactMetadata {
    pub fn new(
        seed: u64,
        token: &CorrelationToken,
        filename: Option<&str>,
        content_type: &str,
    ) -> Self {
        Self {
            status: "completed".to_string(),
            seed,
            client_id: token.to_string(),
            correlation_token: token.to_string(),
            filename: filename.map(str::to_string),
            content_type: content_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}
