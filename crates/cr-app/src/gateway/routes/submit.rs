use std::sync::Arc;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use log::{debug, info};
use tracing::{Instrument, Span, field, info_span};
use cr_composite::CompositeResponse;
use cr_core::{CorrelationToken, GenerationRequest};
use crate::error::AppError;
use crate::gateway::schemas::{ArtifactMetadata, SubmitAccepted};
use crate::gateway::state::GatewayState;
use crate::job::{JobStatus, JobTracker};

pub async fn submit_prompt(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let span = info_span!("submit_prompt", client_id = field::Empty);

    async move {
        let mut job = JobTracker::new();
        let result = run(&state, payload, &mut job).await;
        if let Err(err) = &result {
            job.advance(err.job_status());
        }
        debug!("Request finished as {:?}", job.status());
        result
    }
    .instrument(span)
    .await
}

async fn run(
    state: &GatewayState,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
    job: &mut JobTracker,
) -> Result<Response, AppError> {
    let Json(mut request) = payload?;

    let seed = request.resolve_seed();
    let token = CorrelationToken::new();
    Span::current().record("client_id", token.as_str());

    let document = state.template.overlay(&request, &token)?;
    job.advance(JobStatus::Validated);

    info!("Submitting job with seed {seed}");
    state.dispatcher.dispatch(&document).await?;
    job.advance(JobStatus::Dispatched);

    if !request.wait_for_image {
        return Ok(Json(SubmitAccepted::new(seed, &token)).into_response());
    }

    job.advance(JobStatus::Waiting);
    let cancel = state.request_cancellation();
    let artifact = state.waiter.wait_for(&token, &cancel).await?;

    let content_type = artifact.content_type();
    let metadata = ArtifactMetadata::new(seed, &token, artifact.file_name(), content_type);
    let encoded = CompositeResponse::new(&metadata, content_type, artifact.bytes)?.encode()?;
    job.advance(JobStatus::Completed);

    Ok(([(header::CONTENT_TYPE, encoded.content_type)], encoded.body).into_response())
}
