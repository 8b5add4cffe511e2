use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use cr_core::JobTemplate;
use crate::dispatcher::Dispatcher;
use crate::waiter::ArtifactWaiter;

/// Everything a request handler needs. Shared read-only across requests.
pub struct GatewayState {
    pub template: JobTemplate,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub waiter: ArtifactWaiter,
    shutdown: CancellationToken,
}

impl GatewayState {
    pub fn new(template: JobTemplate, dispatcher: Arc<dyn Dispatcher>, waiter: ArtifactWaiter) -> Self {
        Self {
            template,
            dispatcher,
            waiter,
            shutdown: CancellationToken::new(),
        }
    }

    /// A token that fires when the server begins shutting down.
    pub fn request_cancellation(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
