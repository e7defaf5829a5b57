//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid tenor ladder.
    #[error("Invalid ladder: {0}. Use comma-separated tenors such as 1M,3M,1Y.")]
    InvalidLadder(String),

    /// Not a currency pair with a forward market.
    #[error("Invalid pair: {0}")]
    InvalidPair(String),

    /// Unusable ticker format.
    #[error("Invalid ticker format: {0}")]
    InvalidFormat(String),

    /// Identifier not present in the catalog.
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Quote source could not be created.
    #[error("Quote source error: {0}")]
    Source(String),

    /// The refresh cycle failed as a whole.
    #[error("Refresh failed: {0}")]
    Refresh(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
