use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::StatusCode;
use cr_core::{JobDocument, JobTemplate};
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::gateway::config::GatewayConfig;
use crate::gateway::state::GatewayState;
use crate::waiter::ArtifactWaiter;

/// The template shipped at the repository root.
pub fn template() -> JobTemplate {
    let raw = include_str!("../../../defaults.json");
    JobTemplate::from_value(serde_json::from_str(raw).unwrap()).unwrap()
}

pub fn config(output_dir: &Path) -> GatewayConfig {
    let mut config = GatewayConfig::from_lookup(|_| None).unwrap();
    config.output_dir = output_dir.to_path_buf();
    config.wait_timeout = Duration::from_secs(2);
    config.poll_interval = Duration::from_millis(20);
    config
}

pub fn state(dispatcher: Arc<dyn Dispatcher>, output_dir: &Path, timeout: Duration) -> Arc<GatewayState> {
    let mut config = config(output_dir);
    config.wait_timeout = timeout;

    Arc::new(GatewayState::new(
        template(),
        dispatcher,
        ArtifactWaiter::from_config(&config),
    ))
}

/// Bytes the fake backend writes for `prefix`: a PNG signature, CRLFs,
/// dashes and the prefix so each artifact is distinguishable, then the IEND
/// chunk.
pub fn artifact_bytes(prefix: &str) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0x00, b'-', b'-', 0xff];
    bytes.extend_from_slice(prefix.as_bytes());
    bytes.extend_from_slice(b"\r\n\r\n\x00\xfe");
    bytes.extend_from_slice(b"\x00\x00\x00\x00IEND\xae\x42\x60\x82");
    bytes
}

/// A JPEG-shaped artifact: SOI marker, `tag`, EOI marker.
pub fn jpeg_bytes(tag: &str) -> Vec<u8> {
    let mut bytes = vec![0xff, 0xd8, 0xff, 0xe0];
    bytes.extend_from_slice(tag.as_bytes());
    bytes.extend_from_slice(&[0xff, 0xd9]);
    bytes
}

enum Mode {
    Render { output_dir: PathBuf, delays: Vec<Duration> },
    Ignore,
    Reject,
}

/// Stands in for the processing backend: records submissions and, when
/// rendering, writes `{prefix}_00001_.png` after a delay.
pub struct FakeBackend {
    mode: Mode,
    submitted: Mutex<Vec<JobDocument>>,
}

impl FakeBackend {
    pub fn rendering(output_dir: &Path, delay: Duration) -> Arc<Self> {
        Self::staggered(output_dir, vec![delay])
    }

    /// The n-th submission renders after `delays[n % delays.len()]`.
    pub fn staggered(output_dir: &Path, delays: Vec<Duration>) -> Arc<Self> {
        Self::with_mode(Mode::Render {
            output_dir: output_dir.to_path_buf(),
            delays,
        })
    }

    pub fn ignoring() -> Arc<Self> {
        Self::with_mode(Mode::Ignore)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::with_mode(Mode::Reject)
    }

    fn with_mode(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn submitted(&self) -> Vec<JobDocument> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for FakeBackend {
    async fn dispatch(&self, job: &JobDocument) -> Result<(), DispatchError> {
        let index = {
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(job.clone());
            submitted.len() - 1
        };

        match &self.mode {
            Mode::Reject => Err(DispatchError::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "queue full".to_string(),
            }),
            Mode::Ignore => Ok(()),
            Mode::Render { output_dir, delays } => {
                let delay = delays[index % delays.len()];
                let prefix = job.output_prefix().unwrap_or_default().to_string();
                let output_dir = output_dir.clone();

                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    // staged then renamed so the waiter never sees a partial file
                    let staging = output_dir.join(format!(".staging-{prefix}"));
                    let target = output_dir.join(format!("{prefix}_00001_.png"));
                    if tokio::fs::write(&staging, artifact_bytes(&prefix)).await.is_ok() {
                        let _ = tokio::fs::rename(&staging, &target).await;
                    }
                });
                Ok(())
            }
        }
    }
}
