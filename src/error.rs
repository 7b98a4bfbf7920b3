use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::result::Error as DieselError;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Scheduler-wide error taxonomy. Storage failures are passed through
/// unchanged; the engine never retries on the caller's behalf.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Review item not found")]
    NotFound,
    #[error("Invalid review result: {0}")]
    InvalidResult(String),
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
    #[error("Subject and topic must be non-empty")]
    InvalidSubjectOrTopic,
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(String),
}

impl From<ValidationErrors> for SchedulerError {
    fn from(err: ValidationErrors) -> Self {
        SchedulerError::Validation(err.to_string())
    }
}

impl From<r2d2::Error> for SchedulerError {
    fn from(err: r2d2::Error) -> Self {
        SchedulerError::PoolError(err.to_string())
    }
}

impl IntoResponse for SchedulerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SchedulerError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            SchedulerError::InvalidResult(_)
            | SchedulerError::InvalidDifficulty(_)
            | SchedulerError::InvalidSubjectOrTopic
            | SchedulerError::InvalidTimestamp(_)
            | SchedulerError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SchedulerError::DatabaseError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            SchedulerError::PoolError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Connection pool error: {}", e),
            ),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
