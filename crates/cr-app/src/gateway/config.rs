use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, ensure};
use log::debug;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub backend_url: String,
    pub output_dir: PathBuf,
    pub template_path: PathBuf,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub dispatch_timeout: Duration,
}

impl GatewayConfig {
    pub fn load() -> anyhow::Result<Self> {
        apply_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: parse_or(&lookup, "PORT", 8000)?,
            backend_url: lookup("BACKEND_URL").unwrap_or_else(|| "http://127.0.0.1:8188".to_string()),
            output_dir: lookup("OUTPUT_DIR").unwrap_or_else(|| "output".to_string()).into(),
            template_path: lookup("TEMPLATE_PATH").unwrap_or_else(|| "defaults.json".to_string()).into(),
            wait_timeout: Duration::from_secs(parse_or(&lookup, "WAIT_TIMEOUT_SECS", 180)?),
            poll_interval: Duration::from_secs(parse_or(&lookup, "POLL_INTERVAL_SECS", 5)?),
            dispatch_timeout: Duration::from_secs(parse_or(&lookup, "DISPATCH_TIMEOUT_SECS", 10)?),
        };

        ensure!(!config.poll_interval.is_zero(), "POLL_INTERVAL_SECS must be greater than zero");
        ensure!(!config.dispatch_timeout.is_zero(), "DISPATCH_TIMEOUT_SECS must be greater than zero");

        Ok(config)
    }

    /// The backend's job submission endpoint.
    pub fn submit_url(&self) -> String {
        format!("{}/prompt", self.backend_url.trim_end_matches('/'))
    }
}

/// A missing `.env` is fine. One that fails to parse is a startup error:
/// dotenvy stops at the bad line and leaves the keys after it unset.
fn apply_dotenv<T: std::fmt::Debug>(loaded: Result<T, dotenvy::Error>) -> anyhow::Result<()> {
    match loaded {
        Ok(source) => {
            debug!("Loaded environment from {source:?}");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("loading .env"),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}
