//! Builder pattern for the curve engine.

use std::sync::Arc;

use curvefeed_config::{EngineSettings, InstrumentCatalog, Validate};
use curvefeed_curves::{CurveAssembler, CurvePipeline};
use curvefeed_traits::QuoteSource;

use crate::error::EngineError;
use crate::refresh::RefreshController;
use crate::CurveEngine;

/// Builder for constructing a [`CurveEngine`].
pub struct CurveEngineBuilder {
    catalog: Option<Arc<InstrumentCatalog>>,
    source: Option<Arc<dyn QuoteSource>>,
    settings: Option<EngineSettings>,
    controller: Option<Arc<RefreshController>>,
}

impl CurveEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            catalog: None,
            source: None,
            settings: None,
            controller: None,
        }
    }

    /// Set the instrument catalog. Defaults to the built-in catalog.
    pub fn with_catalog(mut self, catalog: Arc<InstrumentCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the quote source.
    pub fn with_quote_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the engine settings.
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Share a refresh controller with other engines.
    pub fn with_controller(mut self, controller: Arc<RefreshController>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Build the curve engine.
    pub fn build(self) -> Result<CurveEngine, EngineError> {
        let settings = self.settings.unwrap_or_default();
        settings.validate_or_error()?;

        let source = self
            .source
            .ok_or_else(|| EngineError::ConfigError("quote source not configured".into()))?;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(InstrumentCatalog::standard()?),
        };

        let pipeline = CurvePipeline::new(
            CurveAssembler::new().with_low_coverage_threshold(settings.low_coverage_threshold_pct),
        );

        Ok(CurveEngine::new(
            catalog,
            source,
            pipeline,
            settings.fields,
            self.controller.unwrap_or_default(),
        ))
    }
}

impl Default for CurveEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use curvefeed_traits::{QuoteBatch, QuoteRequest, SourceType, TraitError};

    struct NullSource;

    #[async_trait]
    impl QuoteSource for NullSource {
        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        async fn fetch_quotes(&self, _: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
            Ok(QuoteBatch::default())
        }
    }

    #[test]
    fn test_source_required() {
        let err = CurveEngineBuilder::new().build().unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = EngineSettings {
            low_coverage_threshold_pct: 150.0,
            ..EngineSettings::default()
        };
        let err = CurveEngineBuilder::new()
            .with_quote_source(Arc::new(NullSource))
            .with_settings(settings)
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_threshold_reaches_assembler() {
        let settings = EngineSettings {
            low_coverage_threshold_pct: 80.0,
            ..EngineSettings::default()
        };
        let engine = CurveEngineBuilder::new()
            .with_quote_source(Arc::new(NullSource))
            .with_settings(settings)
            .build()
            .unwrap();
        assert!(format!("{:?}", engine).contains("80.0"));
        assert!(engine.resolver().catalog().len() > 40);
    }
}
