//! API error types.
//!
//! Engine errors are mapped by kind:
//! - not found -> 404
//! - rejected requests and invalid input -> 400 with the engine's message
//! - lost concurrency races -> 409
//! - storage and configuration failures -> 500 with a generic message

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fondo_core::error::{ErrorKind, FondoError};
use fondo_core::types::ValidationError;
use fondo_engine::NotifierError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Rejected request or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// Concurrent update conflict
    #[error("{0}")]
    Conflict(String),

    /// Internal server error; the detail is logged, never returned
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code string.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<FondoError> for ApiError {
    fn from(err: FondoError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Validation => Self::BadRequest(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Storage | ErrorKind::Config => Self::Internal(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<NotifierError> for ApiError {
    fn from(err: NotifierError) -> Self {
        if err.is_invalid_input() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Error response body.
///
/// Also attached to the response extensions so the request-id middleware
/// can stamp `request_id` into it.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error status
    pub status: &'static str,
    /// Error code
    pub code: &'static str,
    /// Error message
    pub message: String,
    /// Request ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!(detail = %detail, "Request failed with internal error");
        }

        let status = self.status_code();
        let body = ErrorResponse {
            status: "error",
            code: self.error_code(),
            message: self.to_string(),
            request_id: None,
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
