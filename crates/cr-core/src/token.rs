use std::fmt;
use serde::Serialize;
use uuid::Uuid;

/// Per-request label the backend stamps onto its output file name.
///
/// 128 random bits rendered as 32 lowercase hex characters, so the value is
/// always safe to use as a filename prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn new() -> Self {
        Self::from(Uuid::new_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `file_name` was produced for this token.
    pub fn labels(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.0)
    }
}

impl Default for CorrelationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationToken {
    fn from(id: Uuid) -> Self {
        Self(id.simple().to_string())
    }
}

impl AsRef<str> for CorrelationToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
