//! Per-identifier post-fetch chain: reconcile, normalize, assemble.

use log::debug;

use curvefeed_config::CurveKind;
use curvefeed_core::CurveId;

use crate::assembler::CurveAssembler;
use crate::curve::Curve;
use crate::error::CurveResult;
use crate::normalizer::normalize_reconciled;
use crate::reconciler::{reconcile_indexed, QuoteIndex};
use crate::resolver::TickerResolution;

/// Stage reached by the post-fetch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Matching quotes to resolutions.
    Reconciling,
    /// Converting raw values.
    Normalizing,
    /// Filtering, ordering and scoring.
    Assembling,
}

/// Builds one identifier's curve from its resolutions and a quote index.
///
/// Holds no mutable state; one instance serves any number of identifiers
/// concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurvePipeline {
    assembler: CurveAssembler,
}

impl CurvePipeline {
    /// Creates a pipeline around an assembler.
    pub fn new(assembler: CurveAssembler) -> Self {
        Self { assembler }
    }

    /// The assembler.
    pub fn assembler(&self) -> &CurveAssembler {
        &self.assembler
    }

    /// Builds a curve.
    pub fn build(
        &self,
        identifier: &CurveId,
        kind: &CurveKind,
        resolutions: &[TickerResolution],
        index: &QuoteIndex<'_>,
    ) -> CurveResult<Curve> {
        self.build_observed(identifier, kind, resolutions, index, |_| {})
    }

    /// Builds a curve, reporting each stage before it starts.
    pub fn build_observed(
        &self,
        identifier: &CurveId,
        kind: &CurveKind,
        resolutions: &[TickerResolution],
        index: &QuoteIndex<'_>,
        mut observe: impl FnMut(PipelineStage),
    ) -> CurveResult<Curve> {
        observe(PipelineStage::Reconciling);
        let reconciled = reconcile_indexed(identifier, resolutions, index)?;

        observe(PipelineStage::Normalizing);
        let normalized = normalize_reconciled(kind, &reconciled);
        if normalized.rejected > 0 {
            debug!(
                "{}: {} of {} term quotes rejected by normalization",
                identifier,
                normalized.rejected,
                reconciled.term_quotes.len()
            );
        }

        observe(PipelineStage::Assembling);
        let mut curve = self.assembler.assemble(
            identifier,
            normalized.anchor,
            normalized.term_points,
            reconciled.requested,
        )?;
        curve.uses_alternate_convention = reconciled.uses_alternate_convention();
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurveError;
    use crate::resolver::TickerResolver;
    use approx::assert_relative_eq;
    use curvefeed_config::InstrumentCatalog;
    use curvefeed_core::{RawQuote, Tenor};
    use std::sync::Arc;

    fn setup(id: &str, ladder: &[Tenor]) -> (CurveKind, Vec<TickerResolution>) {
        let catalog = Arc::new(InstrumentCatalog::standard().unwrap());
        let kind = catalog.get(&CurveId::new(id)).unwrap().kind;
        let resolver = TickerResolver::new(catalog);
        (kind, resolver.resolve(&CurveId::new(id), ladder).unwrap())
    }

    #[test]
    fn test_eurusd_end_to_end() {
        let id = CurveId::new("EURUSD");
        let (kind, rs) = setup("EURUSD", &[Tenor::Months(3), Tenor::Months(1), Tenor::Years(1)]);
        let quotes = vec![
            RawQuote::priced("EURUSD Curncy", 1.0850).with_bid_ask(1.0849, 1.0851),
            RawQuote::priced("EURUSD1Y Curncy", 45.2),
            RawQuote::priced("EURUSD3M Curncy", -10.5),
            RawQuote::failed("EURUSD1M Curncy"),
        ];
        let mut stages = Vec::new();
        let curve = CurvePipeline::default()
            .build_observed(&id, &kind, &rs, &QuoteIndex::new(&quotes), |s| stages.push(s))
            .unwrap();

        assert_eq!(
            stages,
            vec![
                PipelineStage::Reconciling,
                PipelineStage::Normalizing,
                PipelineStage::Assembling
            ]
        );
        assert_eq!(curve.labels(), vec!["Spot", "3M", "1Y"]);
        assert_relative_eq!(curve.points[1].derived_rate, 1.08395, epsilon = 1e-12);
        assert_eq!(curve.points[0].bid, Some(1.0849));
        assert_eq!(curve.points[0].implied_yield, 0.0);
        assert_eq!(curve.data_quality.valid_points, 3);
        assert_eq!(curve.data_quality.coverage_pct, 75);
        assert!(!curve.uses_alternate_convention);
    }

    #[test]
    fn test_anchor_missing_aborts() {
        let id = CurveId::new("EURUSD");
        let (kind, rs) = setup("EURUSD", &[Tenor::Months(1)]);
        let quotes = vec![
            RawQuote::failed("EURUSD Curncy"),
            RawQuote::priced("EURUSD1M Curncy", 12.0),
        ];
        let mut stages = Vec::new();
        let err = CurvePipeline::default()
            .build_observed(&id, &kind, &rs, &QuoteIndex::new(&quotes), |s| stages.push(s))
            .unwrap_err();
        assert!(matches!(err, CurveError::AnchorMissing { .. }));
        assert_eq!(stages, vec![PipelineStage::Reconciling]);
    }

    #[test]
    fn test_anchor_only_when_no_terms_quote() {
        let id = CurveId::new("USDINR");
        let (kind, rs) = setup("USDINR", &Tenor::standard_forward_ladder());
        let quotes = vec![RawQuote::priced("USDINR Curncy", 83.2)];
        let curve = CurvePipeline::default()
            .build(&id, &kind, &rs, &QuoteIndex::new(&quotes))
            .unwrap();
        assert_eq!(curve.data_quality.valid_points, 1);
        // anchor + six in-coverage NDF tenors requested
        assert_eq!(curve.data_quality.requested_points, 7);
        assert_eq!(curve.data_quality.coverage_pct, 14);
        assert!(curve.data_quality.low_coverage);
        assert!(curve.uses_alternate_convention);
    }

    #[test]
    fn test_idempotent() {
        let id = CurveId::new("USDJPY");
        let (kind, rs) = setup("USDJPY", &Tenor::standard_forward_ladder());
        let quotes = vec![
            RawQuote::priced("USDJPY Curncy", 110.0),
            RawQuote::priced("USDJPY1M Curncy", -35.1),
            RawQuote::priced("USDJPY1Y Curncy", -420.0).with_last_update("2024-03-01"),
        ];
        let pipeline = CurvePipeline::default();
        let a = pipeline.build(&id, &kind, &rs, &QuoteIndex::new(&quotes)).unwrap();
        let b = pipeline.build(&id, &kind, &rs, &QuoteIndex::new(&quotes)).unwrap();
        assert_eq!(a, b);
        for (p, q) in a.points.iter().zip(&b.points) {
            assert_eq!(p.derived_rate.to_bits(), q.derived_rate.to_bits());
            assert_eq!(p.implied_yield.to_bits(), q.implied_yield.to_bits());
        }
        assert_relative_eq!(a.points[2].derived_rate, 105.8, epsilon = 1e-10);
    }
}
