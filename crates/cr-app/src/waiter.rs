use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use image::ImageFormat;
use log::{debug, warn};
use thiserror::Error;
use tokio::fs;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use cr_core::CorrelationToken;
use crate::gateway::config::GatewayConfig;

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("no artifact appeared within {waited:?}")]
    TimedOut { waited: Duration },

    #[error("wait cancelled")]
    Cancelled,
}

/// An output file the backend produced for one token.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()?.to_str()
    }
}

/// Polls the shared output directory for files labelled with a token.
#[derive(Debug, Clone)]
pub struct ArtifactWaiter {
    output_dir: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
}

impl ArtifactWaiter {
    pub fn new(output_dir: impl Into<PathBuf>, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            output_dir: output_dir.into(),
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(&config.output_dir, config.wait_timeout, config.poll_interval)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Waits until an artifact for `token` shows up, the timeout budget runs
    /// out, or `cancel` fires. The directory is scanned once more at the
    /// deadline before giving up.
    pub async fn wait_for(
        &self,
        token: &CorrelationToken,
        cancel: &CancellationToken,
    ) -> Result<Artifact, WaitError> {
        let started = Instant::now();

        loop {
            if let Some(artifact) = self.scan(token).await {
                debug!(
                    "Found artifact {} after {:?}",
                    artifact.path.display(),
                    started.elapsed()
                );
                return Ok(artifact);
            }

            let waited = started.elapsed();
            if waited >= self.timeout {
                return Err(WaitError::TimedOut { waited });
            }

            let pause = self.poll_interval.min(self.timeout - waited);
            tokio::select! {
                () = cancel.cancelled() => return Err(WaitError::Cancelled),
                () = time::sleep(pause) => {}
            }
        }
    }

    /// First complete match in directory-listing order. That order is
    /// unspecified, so with several matches any one of them may be returned.
    /// Anything that cannot be listed or read yet counts as no match.
    async fn scan(&self, token: &CorrelationToken) -> Option<Artifact> {
        let mut entries = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list output dir {}: {e}", self.output_dir.display());
                return None;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => return None,
                Err(e) => {
                    warn!("Listing {} failed: {e}", self.output_dir.display());
                    return None;
                }
            };

            let Some(format) = artifact_format(token, &entry.file_name()) else {
                continue;
            };

            let path = entry.path();
            if !fs::metadata(&path).await.is_ok_and(|meta| meta.is_file()) {
                continue;
            }

            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Cannot read artifact {}: {e}", path.display());
                    continue;
                }
            };

            if !is_complete(format, &bytes) {
                debug!("{} is still being written", path.display());
                continue;
            }

            return Some(Artifact { path, format, bytes });
        }
    }
}

const PNG_TRAILER: &[u8] = b"IEND\xae\x42\x60\x82";
const JPEG_TRAILER: &[u8] = &[0xff, 0xd9];

/// Whether `bytes` start with the signature of `format` and end with its
/// end-of-image marker.
fn is_complete(format: ImageFormat, bytes: &[u8]) -> bool {
    if image::guess_format(bytes).ok() != Some(format) {
        return false;
    }

    match format {
        ImageFormat::Png => bytes.ends_with(PNG_TRAILER),
        ImageFormat::Jpeg => bytes.ends_with(JPEG_TRAILER),
        _ => false,
    }
}

/// The image format of `file_name` if it is an artifact for `token`.
fn artifact_format(token: &CorrelationToken, file_name: &OsStr) -> Option<ImageFormat> {
    let name = file_name.to_str()?;
    if !token.labels(name) {
        return None;
    }

    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ImageFormat::from_extension(extension)
        .filter(|format| matches!(format, ImageFormat::Jpeg | ImageFormat::Png))
}
