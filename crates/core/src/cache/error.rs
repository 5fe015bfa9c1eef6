use thiserror::Error;

/// Errors produced by a fetch against the transport.
///
/// `Aborted` is not a failure: it marks a fetch that was cancelled and must
/// leave no trace in the cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Request aborted")]
    Aborted,
}

impl FetchError {
    /// Returns true if this outcome is a cancellation rather than a failure.
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
