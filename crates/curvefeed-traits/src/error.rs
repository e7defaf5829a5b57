//! Error types for trait operations.

use thiserror::Error;

/// Common error type for quote-source operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Source rejected the request or reported failure
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Source returned a non-success HTTP status
    #[error("HTTP status {status}: {message}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Body excerpt or reason
        message: String,
    },

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Source not available
    #[error("source not available: {0}")]
    SourceNotAvailable(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}
