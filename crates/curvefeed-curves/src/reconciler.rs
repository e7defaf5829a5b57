//! Response reconciliation.
//!
//! Pairs returned quotes with the resolutions that asked for them. Matching is
//! by exact ticker identity: a quote for `"USDTRY35D Curncy"` never satisfies a
//! request for `"USDTRY5D Curncy"`.

use std::collections::HashMap;

use log::{debug, warn};

use curvefeed_core::{CurveId, RawQuote, Ticker};

use crate::error::{CurveError, CurveResult};
use crate::resolver::TickerResolution;

/// Exact-ticker index over a quote batch.
///
/// When the source repeats a ticker, the first occurrence wins.
#[derive(Debug, Default)]
pub struct QuoteIndex<'a> {
    by_ticker: HashMap<&'a Ticker, &'a RawQuote>,
}

impl<'a> QuoteIndex<'a> {
    /// Indexes a batch.
    pub fn new(quotes: &'a [RawQuote]) -> Self {
        let mut by_ticker = HashMap::with_capacity(quotes.len());
        for quote in quotes {
            if by_ticker.contains_key(&quote.ticker) {
                warn!("duplicate quote for {} ignored", quote.ticker);
                continue;
            }
            by_ticker.insert(&quote.ticker, quote);
        }
        Self { by_ticker }
    }

    /// Quote for a ticker, if returned.
    pub fn get(&self, ticker: &Ticker) -> Option<&'a RawQuote> {
        self.by_ticker.get(ticker).copied()
    }

    /// Number of distinct tickers.
    pub fn len(&self) -> usize {
        self.by_ticker.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.by_ticker.is_empty()
    }
}

/// A term resolution with its usable quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedQuote {
    /// What was requested.
    pub resolution: TickerResolution,
    /// What came back.
    pub quote: RawQuote,
    /// The primary value (finite, from a successful quote).
    pub value: f64,
}

/// Quotes matched back to one identifier's resolutions.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledQuotes {
    /// Identifier.
    pub identifier: CurveId,
    /// Anchor paired with its quote; its value is finite and positive.
    pub anchor: PairedQuote,
    /// Usable term quotes in resolution order.
    pub term_quotes: Vec<PairedQuote>,
    /// Term resolutions with no usable quote.
    pub absent: Vec<TickerResolution>,
    /// Number of resolutions requested, anchor included.
    pub requested: usize,
}

impl ReconciledQuotes {
    /// True if any term ticker came from an alternate convention.
    pub fn uses_alternate_convention(&self) -> bool {
        self.term_quotes
            .iter()
            .map(|p| &p.resolution)
            .chain(self.absent.iter())
            .any(|r| r.uses_alternate_convention)
    }
}

/// Reconciles one identifier against a quote batch.
pub fn reconcile(
    identifier: &CurveId,
    resolutions: &[TickerResolution],
    quotes: &[RawQuote],
) -> CurveResult<ReconciledQuotes> {
    reconcile_indexed(identifier, resolutions, &QuoteIndex::new(quotes))
}

/// Reconciles one identifier against a prebuilt index.
///
/// Fails with `AnchorMissing` when the anchor quote is absent, failed,
/// non-numeric or non-positive; no term quote is examined in that case.
pub fn reconcile_indexed(
    identifier: &CurveId,
    resolutions: &[TickerResolution],
    index: &QuoteIndex<'_>,
) -> CurveResult<ReconciledQuotes> {
    let mut anchors = resolutions.iter().filter(|r| r.is_anchor());
    let anchor_resolution = anchors
        .next()
        .ok_or_else(|| CurveError::configuration(identifier, "no anchor resolution"))?;
    if anchors.next().is_some() {
        return Err(CurveError::configuration(
            identifier,
            "more than one anchor resolution",
        ));
    }

    let anchor_ticker = anchor_resolution.ticker.as_str();
    let anchor_quote = index
        .get(&anchor_resolution.ticker)
        .ok_or_else(|| CurveError::anchor_missing(identifier, anchor_ticker, "not returned"))?;
    if !anchor_quote.success {
        return Err(CurveError::anchor_missing(
            identifier,
            anchor_ticker,
            "source reported failure",
        ));
    }
    let anchor_value = anchor_quote.primary_value().ok_or_else(|| {
        CurveError::anchor_missing(identifier, anchor_ticker, "no numeric last value")
    })?;
    if anchor_value <= 0.0 {
        return Err(CurveError::anchor_missing(
            identifier,
            anchor_ticker,
            format!("non-positive value {}", anchor_value),
        ));
    }

    let mut term_quotes = Vec::new();
    let mut absent = Vec::new();
    for resolution in resolutions.iter().filter(|r| !r.is_anchor()) {
        match index
            .get(&resolution.ticker)
            .and_then(|q| q.primary_value().map(|v| (q, v)))
        {
            Some((quote, value)) => term_quotes.push(PairedQuote {
                resolution: resolution.clone(),
                quote: quote.clone(),
                value,
            }),
            None => {
                debug!("{}: no usable quote for {}", identifier, resolution.ticker);
                absent.push(resolution.clone());
            }
        }
    }

    Ok(ReconciledQuotes {
        identifier: identifier.clone(),
        anchor: PairedQuote {
            resolution: anchor_resolution.clone(),
            quote: anchor_quote.clone(),
            value: anchor_value,
        },
        term_quotes,
        absent,
        requested: resolutions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_core::{InstrumentClass, InstrumentSpec, Tenor};

    fn resolution(ticker: &str, tenor: Tenor) -> TickerResolution {
        let instrument = if tenor.is_anchor() {
            InstrumentSpec::anchor("USDTRY", "Spot", InstrumentClass::ForwardOrOis, ticker)
        } else {
            InstrumentSpec::term("USDTRY", tenor, InstrumentClass::ForwardOrOis, ticker)
        };
        TickerResolution {
            instrument,
            ticker: Ticker::new(ticker),
            uses_alternate_convention: false,
        }
    }

    fn id() -> CurveId {
        CurveId::new("USDTRY")
    }

    fn ladder() -> Vec<TickerResolution> {
        vec![
            resolution("USDTRY Curncy", Tenor::Overnight),
            resolution("USDTRY5D Curncy", Tenor::Days(5)),
            resolution("USDTRY1M Curncy", Tenor::Months(1)),
        ]
    }

    #[test]
    fn test_exact_match_only() {
        let quotes = vec![
            RawQuote::priced("USDTRY Curncy", 32.5),
            RawQuote::priced("USDTRY35D Curncy", 4000.0),
            RawQuote::priced("USDTRY1M Curncy", 3500.0),
        ];
        let r = reconcile(&id(), &ladder(), &quotes).unwrap();
        assert_eq!(r.term_quotes.len(), 1);
        assert_eq!(r.term_quotes[0].resolution.ticker.as_str(), "USDTRY1M Curncy");
        assert_eq!(r.absent.len(), 1);
        assert_eq!(r.absent[0].ticker.as_str(), "USDTRY5D Curncy");
        assert_eq!(r.requested, 3);
    }

    #[test]
    fn test_failed_and_non_numeric_are_absent() {
        let mut nan = RawQuote::priced("USDTRY1M Curncy", 0.0);
        nan.fields.last = None;
        let quotes = vec![
            RawQuote::priced("USDTRY Curncy", 32.5),
            RawQuote::failed("USDTRY5D Curncy"),
            nan,
        ];
        let r = reconcile(&id(), &ladder(), &quotes).unwrap();
        assert!(r.term_quotes.is_empty());
        assert_eq!(r.absent.len(), 2);
    }

    #[test]
    fn test_anchor_missing_cases() {
        let cases = vec![
            vec![],
            vec![RawQuote::failed("USDTRY Curncy")],
            vec![RawQuote::priced("USDTRY Curncy", 0.0)],
            vec![RawQuote::priced("USDTRY Curncy", -1.0)],
            vec![RawQuote::priced("USDTRY Curncy", f64::INFINITY)],
        ];
        for quotes in cases {
            let err = reconcile(&id(), &ladder(), &quotes).unwrap_err();
            assert!(matches!(err, CurveError::AnchorMissing { .. }), "{:?}", quotes);
        }
    }

    #[test]
    fn test_first_duplicate_wins() {
        let quotes = vec![
            RawQuote::priced("USDTRY Curncy", 32.5),
            RawQuote::priced("USDTRY Curncy", 99.0),
        ];
        let r = reconcile(&id(), &ladder(), &quotes).unwrap();
        assert_eq!(r.anchor.value, 32.5);
    }

    #[test]
    fn test_missing_anchor_resolution() {
        let rs = vec![resolution("USDTRY1M Curncy", Tenor::Months(1))];
        let err = reconcile(&id(), &rs, &[]).unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
    }

    #[test]
    fn test_term_order_follows_resolutions() {
        let rs = vec![
            resolution("USDTRY Curncy", Tenor::Overnight),
            resolution("USDTRY1M Curncy", Tenor::Months(1)),
            resolution("USDTRY5D Curncy", Tenor::Days(5)),
        ];
        let quotes = vec![
            RawQuote::priced("USDTRY5D Curncy", 700.0),
            RawQuote::priced("USDTRY1M Curncy", 3500.0),
            RawQuote::priced("USDTRY Curncy", 32.5),
        ];
        let r = reconcile(&id(), &rs, &quotes).unwrap();
        let labels: Vec<&str> = r.term_quotes.iter().map(|p| p.resolution.label()).collect();
        assert_eq!(labels, vec!["1M", "5D"]);
    }
}
