//! Error types for core domain parsing.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while parsing or constructing core domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Currency code is not recognised.
    #[error("Invalid currency code: {code}")]
    InvalidCurrency {
        /// The rejected code.
        code: String,
    },

    /// Currency pair could not be parsed.
    #[error("Invalid currency pair: {pair} - {reason}")]
    InvalidCurrencyPair {
        /// The rejected pair string.
        pair: String,
        /// Reason for rejection.
        reason: String,
    },

    /// Tenor label could not be parsed.
    #[error("Invalid tenor: {tenor} - {reason}")]
    InvalidTenor {
        /// The rejected tenor label.
        tenor: String,
        /// Reason for rejection.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid tenor error.
    pub fn invalid_tenor(tenor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid currency pair error.
    pub fn invalid_pair(pair: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCurrencyPair {
            pair: pair.into(),
            reason: reason.into(),
        }
    }
}
