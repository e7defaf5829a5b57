//! Assembled curves and their points.

use serde::{Deserialize, Serialize};

use curvefeed_core::{CurveId, Ticker};

use crate::quality::DataQuality;

/// One point on an assembled curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    /// Tenor in calendar days (0 for the anchor).
    pub tenor_days: u32,
    /// Tenor in years (days / 365).
    pub tenor_years: f64,
    /// Value as quoted.
    pub raw_value: f64,
    /// Outright rate (FX) or the rate itself.
    pub derived_rate: f64,
    /// Forward points, for FX forwards.
    pub derived_points: Option<f64>,
    /// Annualised implied yield in percent (0 at an FX anchor).
    pub implied_yield: f64,
    /// Display label.
    pub label: String,
    /// Ticker the value came from.
    pub ticker: Ticker,
    /// Bid as quoted.
    pub bid: Option<f64>,
    /// Ask as quoted.
    pub ask: Option<f64>,
    /// Source last-update stamp.
    pub last_update: Option<String>,
    /// True for the spot/overnight anchor.
    pub is_anchor: bool,
}

impl CurvePoint {
    /// True when the point can be displayed: finite positive rate, finite
    /// yield, and non-empty ticker and label.
    pub fn is_valid(&self) -> bool {
        self.derived_rate.is_finite()
            && self.derived_rate > 0.0
            && self.implied_yield.is_finite()
            && !self.ticker.is_empty()
            && !self.label.trim().is_empty()
    }

    /// Bid/ask spread, when both sides are present.
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// An immutable curve snapshot for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    /// Identifier.
    pub identifier: CurveId,
    /// Points, anchor first, ascending by tenor.
    pub points: Vec<CurvePoint>,
    /// Data-quality summary.
    pub data_quality: DataQuality,
    /// True when term tickers came from an alternate (NDF) convention.
    #[serde(default)]
    pub uses_alternate_convention: bool,
}

impl Curve {
    /// The anchor point.
    pub fn anchor(&self) -> Option<&CurvePoint> {
        self.points.iter().find(|p| p.is_anchor)
    }

    /// Term points (everything but the anchor).
    pub fn term_points(&self) -> impl Iterator<Item = &CurvePoint> {
        self.points.iter().filter(|p| !p.is_anchor)
    }

    /// Point at an exact tenor.
    pub fn point_at(&self, tenor_days: u32) -> Option<&CurvePoint> {
        self.points.iter().find(|p| p.tenor_days == tenor_days)
    }

    /// Number of points including the anchor.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for an assembled curve, which always holds its anchor.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Labels in curve order.
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }
}
