//! Curve assembly.

use log::debug;

use curvefeed_core::CurveId;

use crate::curve::{Curve, CurvePoint};
use crate::error::{CurveError, CurveResult};
use crate::quality::DataQuality;

/// Default coverage threshold (percent) for the low-coverage flag.
pub const DEFAULT_LOW_COVERAGE_THRESHOLD_PCT: f64 = 50.0;

/// Filters, orders and scores normalized points into a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveAssembler {
    low_coverage_threshold_pct: f64,
}

impl Default for CurveAssembler {
    fn default() -> Self {
        Self {
            low_coverage_threshold_pct: DEFAULT_LOW_COVERAGE_THRESHOLD_PCT,
        }
    }
}

impl CurveAssembler {
    /// Creates an assembler with the default threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the low-coverage threshold in percent.
    pub fn with_low_coverage_threshold(mut self, pct: f64) -> Self {
        self.low_coverage_threshold_pct = pct;
        self
    }

    /// The low-coverage threshold in percent.
    pub fn low_coverage_threshold(&self) -> f64 {
        self.low_coverage_threshold_pct
    }

    /// Assembles a curve.
    ///
    /// Invalid term points are dropped; the rest are stably sorted by tenor
    /// (equal tenors keep their input order) behind the anchor.
    /// `requested_points` counts every instrument requested, anchor included.
    /// An anchor-only result is still a curve, flagged low-coverage.
    pub fn assemble(
        &self,
        identifier: &CurveId,
        anchor: CurvePoint,
        term_points: Vec<CurvePoint>,
        requested_points: usize,
    ) -> CurveResult<Curve> {
        if !anchor.is_valid() {
            return Err(CurveError::anchor_missing(
                identifier,
                anchor.ticker.as_str(),
                "anchor point is not valid",
            ));
        }

        let before = term_points.len();
        let mut term_points: Vec<CurvePoint> = term_points
            .into_iter()
            .filter(|p| !p.is_anchor && p.tenor_days > 0 && p.is_valid())
            .collect();
        if term_points.len() < before {
            debug!(
                "{}: dropped {} invalid points",
                identifier,
                before - term_points.len()
            );
        }
        term_points.sort_by_key(|p| p.tenor_days);

        let data_quality =
            DataQuality::assess(&term_points, requested_points, self.low_coverage_threshold_pct);

        let mut points = Vec::with_capacity(term_points.len() + 1);
        points.push(CurvePoint {
            is_anchor: true,
            ..anchor
        });
        points.extend(term_points);

        Ok(Curve {
            identifier: identifier.clone(),
            points,
            data_quality,
            uses_alternate_convention: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::CoverageTier;
    use curvefeed_core::Ticker;

    fn point(days: u32, label: &str, rate: f64) -> CurvePoint {
        CurvePoint {
            tenor_days: days,
            tenor_years: f64::from(days) / 365.0,
            raw_value: rate,
            derived_rate: rate,
            derived_points: None,
            implied_yield: rate,
            label: label.to_string(),
            ticker: Ticker::new(format!("T{} {}", days, label)),
            bid: None,
            ask: None,
            last_update: None,
            is_anchor: days == 0,
        }
    }

    fn id() -> CurveId {
        CurveId::new("USD_SOFR")
    }

    #[test]
    fn test_sorts_and_filters() {
        let curve = CurveAssembler::new()
            .assemble(
                &id(),
                point(0, "ON", 5.31),
                vec![
                    point(365, "1Y", 4.9),
                    point(30, "1M", 5.3),
                    point(90, "3M", f64::NAN),
                    point(180, "6M", -0.1),
                    point(730, "", 4.5),
                ],
                6,
            )
            .unwrap();
        assert_eq!(curve.labels(), vec!["ON", "1M", "1Y"]);
        assert_eq!(curve.data_quality.valid_points, 3);
        assert_eq!(curve.data_quality.requested_points, 6);
        assert_eq!(curve.data_quality.coverage_pct, 50);
        assert!(!curve.data_quality.low_coverage);
        assert!(curve.anchor().unwrap().is_anchor);
    }

    #[test]
    fn test_stable_sort_on_ties() {
        let mut a = point(30, "1M", 5.0);
        a.ticker = Ticker::new("FIRST");
        let mut b = point(30, "1M", 5.1);
        b.ticker = Ticker::new("SECOND");
        let curve = CurveAssembler::new()
            .assemble(&id(), point(0, "ON", 5.3), vec![a, b], 3)
            .unwrap();
        assert_eq!(curve.points[1].ticker.as_str(), "FIRST");
        assert_eq!(curve.points[2].ticker.as_str(), "SECOND");
    }

    #[test]
    fn test_anchor_only_curve() {
        let curve = CurveAssembler::new()
            .assemble(&id(), point(0, "ON", 5.31), vec![], 13)
            .unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.data_quality.valid_points, 1);
        assert_eq!(curve.data_quality.coverage_pct, 8);
        assert!(curve.data_quality.low_coverage);
        assert_eq!(curve.data_quality.tier, CoverageTier::AnchorOnly);
    }

    #[test]
    fn test_invalid_anchor() {
        let err = CurveAssembler::new()
            .assemble(&id(), point(0, "ON", 0.0), vec![point(30, "1M", 5.0)], 2)
            .unwrap_err();
        assert!(matches!(err, CurveError::AnchorMissing { .. }));
    }

    #[test]
    fn test_threshold() {
        let assembler = CurveAssembler::new().with_low_coverage_threshold(90.0);
        let curve = assembler
            .assemble(
                &id(),
                point(0, "ON", 5.31),
                vec![point(30, "1M", 5.3), point(90, "3M", 5.2)],
                4,
            )
            .unwrap();
        assert_eq!(curve.data_quality.coverage_pct, 75);
        assert!(curve.data_quality.low_coverage);
    }
}
