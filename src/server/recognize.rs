//! `POST /api/recognize` - run one recognition job
//!
//! Success is always the normalized result, recognized or not. Failures come
//! back as `{ "error": <kind>, "message": ... }` with a status code per kind,
//! so the page can tell "nothing recognized" apart from a broken pipeline.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::AppState;
use crate::jobs::JobError;
use crate::recognition::{NormalizedResult, RecognitionInput};

/// POST /api/recognize
pub async fn recognize(
    State(state): State<AppState>,
    payload: Result<Json<RecognitionInput>, JsonRejection>,
) -> Result<Json<NormalizedResult>, ApiError> {
    let Json(input) = payload?;

    let cancel = state.shutdown.child_token();
    let result = state.orchestrator.run(&input, &cancel).await?;

    tracing::info!(recognized = result.is_recognized(), "Recognition request finished");
    Ok(Json(result))
}

/// Error response for the recognize endpoint
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as an input object
    BadRequest { status: StatusCode, message: String },
    /// The job failed somewhere between submission and output retrieval
    Job(JobError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Job(err) => match err {
                JobError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                JobError::PollTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                JobError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
                JobError::Submission { .. }
                | JobError::StatusCheck { .. }
                | JobError::JobFailed { .. }
                | JobError::OutputRetrieval(_)
                | JobError::OutputStorage(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Job(err) => err.kind(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        ApiError::Job(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest { message, .. } => message.clone(),
            ApiError::Job(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), %status, "Recognition request failed: {}", message);
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
