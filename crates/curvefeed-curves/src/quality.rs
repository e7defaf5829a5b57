//! Data-quality scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

use curvefeed_core::Tenor;

use crate::curve::CurvePoint;

const FIVE_YEARS: u32 = 1825;
const THREE_YEARS: u32 = 1095;
const TWO_YEARS: u32 = 730;

/// How far out a curve's valid data reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTier {
    /// 5Y present and at least ten term points.
    Full5Y,
    /// 3Y present and at least eight term points.
    Full3Y,
    /// Longest valid tenor is two years or more.
    PartialLong,
    /// Some term points, all shorter than two years.
    PartialShort,
    /// Anchor only.
    AnchorOnly,
}

impl CoverageTier {
    /// All tiers, best first.
    pub const ALL: [CoverageTier; 5] = [
        CoverageTier::Full5Y,
        CoverageTier::Full3Y,
        CoverageTier::PartialLong,
        CoverageTier::PartialShort,
        CoverageTier::AnchorOnly,
    ];

    /// Classifies a set of valid term points.
    pub fn classify(term_points: &[CurvePoint]) -> Self {
        let count = term_points.len();
        let has = |days: u32| term_points.iter().any(|p| p.tenor_days == days);
        let longest = term_points.iter().map(|p| p.tenor_days).max().unwrap_or(0);

        if has(FIVE_YEARS) && count >= 10 {
            CoverageTier::Full5Y
        } else if has(THREE_YEARS) && count >= 8 {
            CoverageTier::Full3Y
        } else if longest >= TWO_YEARS {
            CoverageTier::PartialLong
        } else if count > 0 {
            CoverageTier::PartialShort
        } else {
            CoverageTier::AnchorOnly
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            CoverageTier::Full5Y => "Full to 5Y",
            CoverageTier::Full3Y => "Full to 3Y",
            CoverageTier::PartialLong => "Partial (2Y+)",
            CoverageTier::PartialShort => "Partial (<2Y)",
            CoverageTier::AnchorOnly => "Anchor only",
        }
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Data-quality summary attached to every curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Retained points, anchor included.
    pub valid_points: usize,
    /// Instruments requested for the identifier, anchor included.
    pub requested_points: usize,
    /// `valid_points / requested_points * 100`, rounded.
    pub coverage_pct: u32,
    /// Anchor-only, or coverage under the configured threshold.
    pub low_coverage: bool,
    /// Coverage tier.
    pub tier: CoverageTier,
    /// Label of the longest valid term tenor.
    pub longest_tenor: Option<String>,
}

impl DataQuality {
    /// Scores a curve given its retained term points.
    pub fn assess(
        term_points: &[CurvePoint],
        requested_points: usize,
        low_coverage_threshold_pct: f64,
    ) -> Self {
        let valid_points = term_points.len() + 1;
        let requested_points = requested_points.max(valid_points);
        let coverage_pct = coverage_pct(valid_points, requested_points);
        let tier = CoverageTier::classify(term_points);
        let longest_tenor = term_points
            .iter()
            .max_by_key(|p| p.tenor_days)
            .map(|p| Tenor::from_days(p.tenor_days).label());

        Self {
            valid_points,
            requested_points,
            coverage_pct,
            low_coverage: tier == CoverageTier::AnchorOnly
                || f64::from(coverage_pct) < low_coverage_threshold_pct,
            tier,
            longest_tenor,
        }
    }
}

/// Rounded percentage of `valid` over `requested`.
pub fn coverage_pct(valid: usize, requested: usize) -> u32 {
    if requested == 0 {
        return 0;
    }
    ((valid as f64 / requested as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(days: u32) -> CurvePoint {
        CurvePoint {
            tenor_days: days,
            tenor_years: f64::from(days) / 365.0,
            raw_value: 1.0,
            derived_rate: 1.0,
            derived_points: Some(1.0),
            implied_yield: 0.0,
            label: Tenor::from_days(days).label(),
            ticker: format!("X{} Curncy", days).into(),
            bid: None,
            ask: None,
            last_update: None,
            is_anchor: false,
        }
    }

    fn points(days: &[u32]) -> Vec<CurvePoint> {
        days.iter().copied().map(point).collect()
    }

    #[test]
    fn test_coverage_pct_rounding() {
        assert_eq!(coverage_pct(1, 3), 33);
        assert_eq!(coverage_pct(2, 3), 67);
        assert_eq!(coverage_pct(1, 13), 8);
        assert_eq!(coverage_pct(13, 13), 100);
        assert_eq!(coverage_pct(1, 0), 0);
    }

    #[test]
    fn test_tiers() {
        let full5 = points(&[7, 14, 30, 60, 90, 180, 270, 365, 730, 1825]);
        assert_eq!(CoverageTier::classify(&full5), CoverageTier::Full5Y);

        let full3 = points(&[7, 14, 30, 60, 90, 180, 365, 1095]);
        assert_eq!(CoverageTier::classify(&full3), CoverageTier::Full3Y);

        // 5Y but too few points
        let sparse = points(&[30, 1825]);
        assert_eq!(CoverageTier::classify(&sparse), CoverageTier::PartialLong);

        let short = points(&[7, 30, 180]);
        assert_eq!(CoverageTier::classify(&short), CoverageTier::PartialShort);

        assert_eq!(CoverageTier::classify(&[]), CoverageTier::AnchorOnly);
    }

    #[test]
    fn test_assess_anchor_only() {
        let q = DataQuality::assess(&[], 13, 50.0);
        assert_eq!(q.valid_points, 1);
        assert_eq!(q.coverage_pct, 8);
        assert!(q.low_coverage);
        assert_eq!(q.tier, CoverageTier::AnchorOnly);
        assert_eq!(q.longest_tenor, None);
    }

    #[test]
    fn test_assess_threshold() {
        let term = points(&[30, 90, 180, 365]);
        let q = DataQuality::assess(&term, 6, 50.0);
        assert_eq!(q.valid_points, 5);
        assert_eq!(q.coverage_pct, 83);
        assert!(!q.low_coverage);
        assert_eq!(q.longest_tenor.as_deref(), Some("1Y"));

        let q = DataQuality::assess(&term, 13, 50.0);
        assert_eq!(q.coverage_pct, 38);
        assert!(q.low_coverage);
    }
}
