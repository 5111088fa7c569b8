//! # REST API Errors
//!
//! Error taxonomy for the resource handlers. Every error maps to exactly
//! one HTTP status; store failures are never retried and render a generic
//! message with the detail kept in the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for resource operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Resource handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path or body cannot be parsed into the expected shape
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A required field is missing or empty
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// No record with the given id
    #[error("resource not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// The underlying store call failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let message = match err {
            // Store detail goes to the log, not the client.
            ApiError::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        Self {
            code: err.status_code().as_u16(),
            error: message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(ref err) = self {
            tracing::error!(error = %err, "store operation failed");
        }
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
