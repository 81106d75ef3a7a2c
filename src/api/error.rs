use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::host::HostError;

/// API error types that can be returned from the invocation route
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Host not ready: {0}")]
    NotReady(String),

    #[error("Handler failure: {0}")]
    HandlerFailure(String),

    #[error("Invocation timeout: {0}")]
    Timeout(String),
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::HandlerFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get the error type string
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotReady(_) => "NotReady",
            ApiError::HandlerFailure(_) => "HandlerFailure",
            ApiError::Timeout(_) => "Timeout",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::HandlerFailure(_) | ApiError::Timeout(_) => {
                tracing::error!(error = %self, "invocation error");
            }
            ApiError::NotReady(_) => {
                tracing::warn!(error = %self, "invocation refused");
            }
            ApiError::BadRequest(_) => {
                tracing::debug!(error = %self, "client error");
            }
        }

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            timestamp: chrono::Utc::now(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<HostError> for ApiError {
    fn from(error: HostError) -> Self {
        match error {
            HostError::NotReady(state) => ApiError::NotReady(format!("state {state:?}")),
            HostError::Timeout(d) => ApiError::Timeout(format!("deadline {d:?} exceeded")),
            HostError::HandlerFailure(msg) => ApiError::HandlerFailure(msg),
            // Load errors abort startup and never reach a request handler.
            HostError::LoadResolution(msg) | HostError::LoadExecution(msg) => {
                ApiError::HandlerFailure(msg)
            }
        }
    }
}
