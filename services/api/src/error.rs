//! Custom error types for the API service
//!
//! Every per-request failure is translated here into the response
//! envelope; nothing in this module crashes the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use common::types::{Envelope, FieldError};
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input, with field-level detail
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Missing/invalid/expired token or bad credentials
    ///
    /// The message is deliberately generic so a caller cannot tell which
    /// part of the credential was wrong.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Duplicate email
    #[error("{0}")]
    Conflict(String),

    /// Scoped lookup miss; also covers "exists but not yours"
    #[error("{0}")]
    NotFound(&'static str),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Anything else
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Shorthand for a single-field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Envelope::validation("Validation failed", errors),
            ),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Envelope::error(message))
            }
            ApiError::Conflict(message) => (StatusCode::CONFLICT, Envelope::error(message)),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, Envelope::error(message)),
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::error("Internal server error"),
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::error("Internal server error"),
            ),
        };

        (status, Json(envelope)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
