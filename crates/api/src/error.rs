//! Error types for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::IncorviaError;
use registry::RegistryError;
use serde_json::json;
use thiserror::Error;

/// Main error type for the API
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] common::error::ConfigurationError),

    /// Registry operation failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Requested resource absent (or not owned by the caller)
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Malformed request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl IncorviaError for Error {}

impl Error {
    /// Get error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config(_) => "API_CONFIG_ERROR",
            Error::Registry(RegistryError::Allocation(_)) => "API_ID_ALLOCATION_EXHAUSTED",
            Error::Registry(RegistryError::Store(_)) => "API_STORE_ERROR",
            Error::NotFound { .. } => "API_NOT_FOUND",
            Error::InvalidRequest { .. } => "API_INVALID_REQUEST",
            Error::Other(_) => "API_INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // The namespace may legitimately fill up; clients can retry
            // after entities are migrated off the shared prefix
            Error::Registry(RegistryError::Allocation(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Registry(RegistryError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now(),
            }
        }));

        (status, body).into_response()
    }
}
