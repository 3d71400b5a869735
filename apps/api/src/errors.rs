use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::{ExtractError, IntakeError, JobFetchError};
use crate::screening::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Intake(#[from] IntakeError),

    #[error("Failed to fetch job description: {0}")]
    JobFetch(#[from] JobFetchError),

    #[error("Failed to parse resume files: {0}")]
    Extract(#[from] ExtractError),

    #[error("Analysis could not start: {0}")]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Intake(e) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.to_string()),
            AppError::JobFetch(e) => {
                tracing::warn!("Job fetch rejected: {e}");
                (StatusCode::BAD_REQUEST, "JOB_FETCH_FAILED", e.to_string())
            }
            AppError::Extract(e) => {
                tracing::warn!("Resume extraction failed: {e}");
                (
                    StatusCode::BAD_REQUEST,
                    "RESUME_PARSE_FAILED",
                    "Failed to parse resume files".to_string(),
                )
            }
            AppError::Pipeline(e) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
