//! Client error types.

use sushisync_core::cache::FetchError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Request aborted")]
    Aborted,
}

impl From<ClientError> for FetchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Request(e) if e.is_decode() => FetchError::Decode(e.to_string()),
            ClientError::Request(e) => FetchError::Network(e.to_string()),
            ClientError::ServerError { status, message } => FetchError::Server { status, message },
            ClientError::NotFound { resource } => FetchError::NotFound { resource },
            ClientError::InvalidResponse(message) => FetchError::Decode(message),
            ClientError::InvalidUrl(message) => FetchError::Network(message),
            ClientError::Aborted => FetchError::Aborted,
        }
    }
}
