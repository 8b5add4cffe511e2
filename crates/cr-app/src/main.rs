mod dispatcher;
mod error;
mod gateway;
mod job;
mod waiter;

#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;
use crate::gateway::Gateway;
use crate::gateway::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::load()?;
    let gateway = Gateway::new(config)?;
    gateway.serve().await
}
