//! Error types for d2i-console handlers

use crate::client::BackendError;
use crate::disambiguation::WorkflowError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., submission already in flight
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend unreachable or answered with an error (502)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::NoSession => ApiError::NotFound(message),
            WorkflowError::OutOfRange(_) | WorkflowError::IncompleteMetadata => {
                ApiError::BadRequest(message)
            }
            WorkflowError::Busy => ApiError::Conflict(message),
            WorkflowError::Backend(e) => ApiError::Backend(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Backend(BackendError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Backend(ref err) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", err.user_message()),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
