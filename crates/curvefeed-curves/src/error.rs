//! Error types for curve construction.
//!
//! Configuration and anchor failures are per-identifier: the identifier's
//! curve is absent and other identifiers are unaffected. Gateway failures are
//! batch-level. Normalization failures only exclude the offending point.

use thiserror::Error;

use curvefeed_core::CurveId;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Identifier unknown, ladder malformed, or a ticker template unusable.
    #[error("Configuration error for {identifier}: {message}")]
    Configuration {
        /// Identifier being resolved.
        identifier: CurveId,
        /// Description.
        message: String,
    },

    /// Anchor (spot/overnight) quote absent or unusable.
    #[error("Anchor missing for {identifier} ({ticker}): {reason}")]
    AnchorMissing {
        /// Identifier being built.
        identifier: CurveId,
        /// Anchor ticker.
        ticker: String,
        /// Why the anchor was rejected.
        reason: String,
    },

    /// The quote request as a whole failed.
    #[error("Gateway error: {message}")]
    Gateway {
        /// Description from the source.
        message: String,
    },

    /// A raw value could not be turned into a usable point.
    #[error("Normalization error: {reason}")]
    Normalization {
        /// Description.
        reason: String,
    },
}

impl CurveError {
    /// Creates a configuration error.
    pub fn configuration(identifier: &CurveId, message: impl Into<String>) -> Self {
        Self::Configuration {
            identifier: identifier.clone(),
            message: message.into(),
        }
    }

    /// Creates an anchor-missing error.
    pub fn anchor_missing(
        identifier: &CurveId,
        ticker: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AnchorMissing {
            identifier: identifier.clone(),
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Creates a gateway error.
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    /// Creates a normalization error.
    pub fn normalization(reason: impl Into<String>) -> Self {
        Self::Normalization {
            reason: reason.into(),
        }
    }

    /// Short kind name for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CurveError::Configuration { .. } => "configuration",
            CurveError::AnchorMissing { .. } => "anchor_missing",
            CurveError::Gateway { .. } => "gateway",
            CurveError::Normalization { .. } => "normalization",
        }
    }
}
