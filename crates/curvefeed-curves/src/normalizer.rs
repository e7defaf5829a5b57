//! Value normalization.
//!
//! Unit rules are decided by convention, never by the magnitude of a value:
//!
//! - FX forwards are always quoted in points:
//!   `rate = anchor + points / pip_factor`, with the pip factor 100 for
//!   yen-quoted pairs and 10 000 otherwise.
//! - Money-market, OIS, government and swap instruments quote the rate itself.
//!
//! For FX the implied yield is `((rate / anchor)^(1 / years) - 1) * 100`,
//! and 0 at the anchor.

use log::debug;

use curvefeed_config::CurveKind;
use curvefeed_core::{CurrencyPair, InstrumentClass};

use crate::curve::CurvePoint;
use crate::error::{CurveError, CurveResult};
use crate::reconciler::{PairedQuote, ReconciledQuotes};

/// Values derived from one raw quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedValue {
    /// Outright rate (FX) or the rate itself.
    pub derived_rate: f64,
    /// Forward points, for FX forwards.
    pub derived_points: Option<f64>,
    /// Implied annualised yield in percent.
    pub implied_yield: f64,
}

/// Outright forward rate from points.
pub fn forward_rate(anchor: f64, points: f64, pair: &CurrencyPair) -> f64 {
    anchor + points / pair.pip_factor()
}

/// Forward points from an outright rate.
pub fn points_from_rate(anchor: f64, rate: f64, pair: &CurrencyPair) -> f64 {
    (rate - anchor) * pair.pip_factor()
}

/// Annualised yield implied by the forward/spot ratio, in percent.
///
/// Zero at (or before) the anchor.
pub fn implied_yield(anchor: f64, rate: f64, tenor_years: f64) -> f64 {
    if tenor_years <= 0.0 {
        return 0.0;
    }
    ((rate / anchor).powf(1.0 / tenor_years) - 1.0) * 100.0
}

/// Normalizes one raw value.
///
/// FX forward curves treat `ForwardOrOis` instruments as points; every other
/// combination is a direct rate. Non-finite or non-positive results fail.
pub fn normalize(
    instrument_class: InstrumentClass,
    anchor: f64,
    raw_value: f64,
    tenor_years: f64,
    meta: &CurveKind,
) -> CurveResult<NormalizedValue> {
    if !raw_value.is_finite() {
        return Err(CurveError::normalization(format!(
            "raw value {} is not finite",
            raw_value
        )));
    }

    let value = match (meta, instrument_class) {
        (CurveKind::FxForward { pair }, InstrumentClass::ForwardOrOis) => {
            if !anchor.is_finite() || anchor <= 0.0 {
                return Err(CurveError::normalization(format!(
                    "anchor {} is not a positive number",
                    anchor
                )));
            }
            let derived_rate = forward_rate(anchor, raw_value, pair);
            NormalizedValue {
                derived_rate,
                derived_points: Some(raw_value),
                implied_yield: implied_yield(anchor, derived_rate, tenor_years),
            }
        }
        _ => NormalizedValue {
            derived_rate: raw_value,
            derived_points: None,
            implied_yield: raw_value,
        },
    };

    if !value.derived_rate.is_finite() || value.derived_rate <= 0.0 {
        return Err(CurveError::normalization(format!(
            "derived rate {} is not a positive number",
            value.derived_rate
        )));
    }
    if !value.implied_yield.is_finite() {
        return Err(CurveError::normalization(format!(
            "implied yield {} is not finite",
            value.implied_yield
        )));
    }
    Ok(value)
}

/// Anchor point values: the anchor itself, with zero points and zero FX yield.
pub fn normalize_anchor(anchor: f64, meta: &CurveKind) -> NormalizedValue {
    match meta {
        CurveKind::FxForward { .. } => NormalizedValue {
            derived_rate: anchor,
            derived_points: Some(0.0),
            implied_yield: 0.0,
        },
        CurveKind::Rates { .. } => NormalizedValue {
            derived_rate: anchor,
            derived_points: None,
            implied_yield: anchor,
        },
    }
}

fn to_point(paired: &PairedQuote, value: NormalizedValue, is_anchor: bool) -> CurvePoint {
    let instrument = &paired.resolution.instrument;
    CurvePoint {
        tenor_days: instrument.tenor_days,
        tenor_years: instrument.tenor_years(),
        raw_value: paired.value,
        derived_rate: value.derived_rate,
        derived_points: value.derived_points,
        implied_yield: value.implied_yield,
        label: instrument.label.clone(),
        ticker: paired.resolution.ticker.clone(),
        bid: paired.quote.fields.bid.filter(|v| v.is_finite()),
        ask: paired.quote.fields.ask.filter(|v| v.is_finite()),
        last_update: paired.quote.fields.last_update.clone(),
        is_anchor,
    }
}

/// Normalized points for one identifier, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCurve {
    /// Anchor point.
    pub anchor: CurvePoint,
    /// Term points that normalized cleanly, in resolution order.
    pub term_points: Vec<CurvePoint>,
    /// Term quotes excluded by normalization.
    pub rejected: usize,
}

/// Normalizes every reconciled quote of an identifier.
///
/// A failing term point is excluded and logged; it never fails the curve.
pub fn normalize_reconciled(meta: &CurveKind, reconciled: &ReconciledQuotes) -> NormalizedCurve {
    let anchor_value = reconciled.anchor.value;
    let anchor = to_point(
        &reconciled.anchor,
        normalize_anchor(anchor_value, meta),
        true,
    );

    let mut term_points = Vec::with_capacity(reconciled.term_quotes.len());
    let mut rejected = 0;
    for paired in &reconciled.term_quotes {
        let instrument = &paired.resolution.instrument;
        match normalize(
            instrument.instrument_class,
            anchor_value,
            paired.value,
            instrument.tenor_years(),
            meta,
        ) {
            Ok(value) => term_points.push(to_point(paired, value, false)),
            Err(e) => {
                debug!(
                    "{}: {} excluded: {}",
                    reconciled.identifier, paired.resolution.ticker, e
                );
                rejected += 1;
            }
        }
    }

    NormalizedCurve {
        anchor,
        term_points,
        rejected,
    }
}
