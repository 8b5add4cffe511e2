pub mod config;
mod routes;
pub mod schemas;
pub mod state;

use std::sync::Arc;
use anyhow::Context;
use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;
use tokio::signal;
use cr_core::JobTemplate;
use crate::dispatcher::HttpDispatcher;
use crate::gateway::config::GatewayConfig;
use crate::gateway::routes::api_routes;
use crate::gateway::state::GatewayState;
use crate::waiter::ArtifactWaiter;

pub struct Gateway {
    config: GatewayConfig,
    state: Arc<GatewayState>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let template = JobTemplate::load(&config.template_path)
            .with_context(|| format!("loading job template from {}", config.template_path.display()))?;
        let dispatcher = HttpDispatcher::new(&config)?;
        let waiter = ArtifactWaiter::from_config(&config);

        let state = GatewayState::new(template, Arc::new(dispatcher), waiter);

        Ok(Self {
            config,
            state: Arc::new(state),
        })
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;

        info!("Starting gateway on port {}", self.config.port);
        info!(
            "Submitting to {}, watching {} (timeout {:?}, poll {:?})",
            self.config.submit_url(),
            self.state.waiter.output_dir().display(),
            self.config.wait_timeout,
            self.config.poll_interval
        );

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown_signal(self.state))
            .await?;

        info!("Gateway shut down");
        Ok(())
    }
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .merge(api_routes())
        .with_state(state)
}

async fn shutdown_signal(state: Arc<GatewayState>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }

    // Waiting requests finish with 503 instead of holding shutdown open
    state.shutdown();
}
