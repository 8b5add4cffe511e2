use std::sync::Arc;
use axum::{Json, Router};
use axum::routing::{get, post};
use crate::gateway::routes::submit::submit_prompt;
use crate::gateway::schemas::HealthResponse;
use crate::gateway::state::GatewayState;

mod submit;

pub fn api_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/submit-prompt/", post(submit_prompt))
        .route("/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
