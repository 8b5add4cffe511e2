use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use thiserror::Error;
use cr_core::JobDocument;
use crate::gateway::config::GatewayConfig;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to reach backend at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend rejected job with HTTP {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Hands a job to the processing backend. Success means the backend accepted
/// the job, not that it finished.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, job: &JobDocument) -> Result<(), DispatchError>;
}

pub struct HttpDispatcher {
    client: reqwest::Client,
    submit_url: String,
}

impl HttpDispatcher {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.dispatch_timeout)
            .build()?;

        Ok(Self {
            client,
            submit_url: config.submit_url(),
        })
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, job: &JobDocument) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.submit_url)
            .json(&job.envelope())
            .send()
            .await
            .map_err(|source| DispatchError::Transport {
                url: self.submit_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected { status, body });
        }

        debug!("Backend accepted job with HTTP {}", response.status());
        Ok(())
    }
}
