//! Engine error types.

use thiserror::Error;

use curvefeed_config::ConfigError;
use curvefeed_curves::CurveError;
use curvefeed_traits::TraitError;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
///
/// Per-identifier failures never surface here; they are recorded in the
/// cycle's snapshot. An `EngineError` fails the whole cycle.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The quote request for the cycle failed as a whole
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Curve error raised outside a single identifier's chain
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Background refresh task did not complete
    #[error("refresh task failed: {0}")]
    TaskFailed(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// True for batch-level quote-source failures.
    pub fn is_gateway(&self) -> bool {
        matches!(
            self,
            EngineError::Gateway(_) | EngineError::Curve(CurveError::Gateway { .. })
        )
    }

    /// The error as a curve-level kind, for callers that report one taxonomy.
    pub fn as_curve_error(&self) -> Option<CurveError> {
        match self {
            EngineError::Gateway(message) => Some(CurveError::gateway(message.clone())),
            EngineError::Curve(e) => Some(e.clone()),
            _ => None,
        }
    }
}

impl From<TraitError> for EngineError {
    fn from(e: TraitError) -> Self {
        EngineError::Gateway(e.to_string())
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::ConfigError(e.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::TaskFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_error_is_gateway() {
        let e: EngineError = TraitError::Timeout.into();
        assert!(e.is_gateway());
        assert!(matches!(e.as_curve_error(), Some(CurveError::Gateway { .. })));
    }

    #[test]
    fn test_config_error_is_not_gateway() {
        let e: EngineError = ConfigError::NotFound {
            key: "USDXYZ".into(),
        }
        .into();
        assert!(!e.is_gateway());
        assert!(e.as_curve_error().is_none());
        assert!(e.to_string().contains("USDXYZ"));
    }
}
