use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use thiserror::Error;
use cr_composite::EncodingError;
use cr_core::ValidationError;
use crate::dispatcher::DispatchError;
use crate::gateway::schemas::ErrorBody;
use crate::job::JobStatus;
use crate::waiter::WaitError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Payload(#[from] JsonRejection),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error from backend: {0}")]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("failed to build response: {0}")]
    Encoding(#[from] EncodingError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Payload(rejection) => rejection.status(),
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Dispatch(_) => StatusCode::BAD_GATEWAY,
            Self::Wait(WaitError::TimedOut { .. }) => StatusCode::REQUEST_TIMEOUT,
            Self::Wait(WaitError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The state a request ends in when it fails with this error.
    pub fn job_status(&self) -> JobStatus {
        match self {
            Self::Payload(_) | Self::Validation(_) => JobStatus::Rejected,
            Self::Dispatch(_) => JobStatus::DispatchFailed,
            Self::Wait(WaitError::TimedOut { .. }) => JobStatus::TimedOut,
            Self::Wait(WaitError::Cancelled) => JobStatus::Cancelled,
            Self::Encoding(_) => JobStatus::Failed,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {status}: {self}");
        } else {
            warn!("Request failed with {status}: {self}");
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
