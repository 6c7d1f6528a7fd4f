//! Mapping from `LendingError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::LendingError;

/// JSON error body: `{error, code, retryable?}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            retryable: None,
        }
    }
}

/// Error type returned by every handler in this adapter.
#[derive(Debug)]
pub struct ApiError(pub LendingError);

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LendingError::Unauthorized => StatusCode::UNAUTHORIZED,
            LendingError::Forbidden { .. } => StatusCode::FORBIDDEN,
            LendingError::NotFound { .. } => StatusCode::NOT_FOUND,
            LendingError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            LendingError::UpstreamFailure {
                retryable: true, ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            LendingError::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            LendingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        let message = match &err {
            // Storage details stay in the logs.
            LendingError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Request failed on storage");
                "internal error".to_string()
            }
            LendingError::UpstreamFailure { message, retryable } => {
                tracing::warn!(error = %message, retryable, "Upstream call failed");
                err.message()
            }
            _ => err.message(),
        };

        let body = ErrorResponse {
            error: message,
            code: err.code().to_string(),
            retryable: matches!(err, LendingError::UpstreamFailure { .. })
                .then(|| err.is_retryable()),
        };

        (status, Json(body)).into_response()
    }
}
