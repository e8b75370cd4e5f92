//! Error types for the markdown generator.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::models::ServiceResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Request errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Machine-readable part of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_WRITE_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Other(_) => "UNKNOWN_ERROR",
        }
    }

    /// Message safe to return to callers. Server-side details stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(_) => "File not found or expired".to_string(),
            Self::Storage(_) => "Failed to store generated markdown".to_string(),
            Self::Internal(_) | Self::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        ServiceResponse::failure(
            self.public_message(),
            ErrorDetail {
                code: self.error_code(),
            },
            status,
        )
        .into_response()
    }
}

impl From<mdgen_storage::Error> for Error {
    fn from(err: mdgen_storage::Error) -> Self {
        match err {
            mdgen_storage::Error::NotFound(id) => Self::NotFound(id),
            mdgen_storage::Error::InvalidInput(msg) => Self::Validation(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
