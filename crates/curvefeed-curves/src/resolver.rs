//! Ticker resolution.
//!
//! Maps an identifier and a tenor ladder to concrete tickers:
//!
//! - the anchor always uses the catalog's canonical spot/overnight ticker
//! - a declared alternate convention is used for every term tenor, and tenors
//!   past its maximum coverage tenor are dropped
//! - otherwise explicit catalog instruments win, then the standard template
//! - identifiers with no term market resolve to the anchor alone

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use curvefeed_config::{CatalogEntry, InstrumentCatalog, TickerTemplate};
use curvefeed_core::{CurveId, InstrumentClass, InstrumentSpec, Tenor, Ticker};

use crate::error::{CurveError, CurveResult};

/// A catalog instrument paired with the concrete ticker requested for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerResolution {
    /// The instrument, with its ticker rendered.
    pub instrument: InstrumentSpec,
    /// Ticker to request.
    pub ticker: Ticker,
    /// True when the ticker comes from the alternate convention.
    pub uses_alternate_convention: bool,
}

impl TickerResolution {
    fn new(
        mut instrument: InstrumentSpec,
        ticker: String,
        uses_alternate_convention: bool,
    ) -> Self {
        instrument.ticker = ticker.clone();
        Self {
            instrument,
            ticker: Ticker::new(ticker),
            uses_alternate_convention,
        }
    }

    /// True for the anchor resolution.
    pub fn is_anchor(&self) -> bool {
        self.instrument.is_anchor()
    }

    /// Tenor in days.
    pub fn tenor_days(&self) -> u32 {
        self.instrument.tenor_days
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.instrument.label
    }
}

/// Resolves identifiers against an immutable catalog.
#[derive(Debug, Clone)]
pub struct TickerResolver {
    catalog: Arc<InstrumentCatalog>,
}

impl TickerResolver {
    /// Creates a resolver over a catalog.
    pub fn new(catalog: Arc<InstrumentCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog.
    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    /// Resolves an identifier using its default ladder.
    pub fn resolve_default(&self, identifier: &CurveId) -> CurveResult<Vec<TickerResolution>> {
        let entry = self.entry(identifier)?;
        self.resolve_entry(entry, &entry.ladder())
    }

    /// Resolves an identifier and ladder to tickers, anchor first.
    ///
    /// An empty ladder resolves to the anchor alone.
    pub fn resolve(
        &self,
        identifier: &CurveId,
        ladder: &[Tenor],
    ) -> CurveResult<Vec<TickerResolution>> {
        let entry = self.entry(identifier)?;
        self.resolve_entry(entry, ladder)
    }

    fn entry(&self, identifier: &CurveId) -> CurveResult<&CatalogEntry> {
        self.catalog
            .get(identifier)
            .ok_or_else(|| CurveError::configuration(identifier, "unknown identifier"))
    }

    fn resolve_entry(
        &self,
        entry: &CatalogEntry,
        ladder: &[Tenor],
    ) -> CurveResult<Vec<TickerResolution>> {
        let id = &entry.identifier;
        check_ladder(id, ladder)?;

        let anchor = entry
            .anchor_spec()
            .map_err(|e| CurveError::configuration(id, e.to_string()))?;
        let anchor_ticker = anchor.ticker.clone();
        let mut resolutions = vec![TickerResolution::new(anchor, anchor_ticker, false)];

        if !entry.has_term_market() {
            if !ladder.is_empty() {
                debug!("{}: no term market, resolving anchor only", id);
            }
            return Ok(resolutions);
        }

        for &tenor in ladder {
            if let Some(resolution) = self.resolve_term(entry, tenor)? {
                resolutions.push(resolution);
            }
        }

        ensure_unique_tickers(id, &resolutions)?;
        Ok(resolutions)
    }

    fn resolve_term(
        &self,
        entry: &CatalogEntry,
        tenor: Tenor,
    ) -> CurveResult<Option<TickerResolution>> {
        let id = &entry.identifier;
        let days = tenor.to_days();
        let ctx = entry.template_context(Some(tenor));
        let render = |template: &TickerTemplate| {
            template
                .render(&ctx)
                .map_err(|e| CurveError::configuration(id, e.to_string()))
        };

        if let Some(alt) = entry.active_alternate() {
            if !alt.covers(days) {
                debug!(
                    "{}: {} beyond alternate coverage ({}), not requested",
                    id, tenor, alt.max_tenor
                );
                return Ok(None);
            }
            let spec = InstrumentSpec::term(
                id.clone(),
                tenor,
                InstrumentClass::ForwardOrOis,
                alt.format.as_str(),
            );
            let ticker = render(&alt.format)?;
            return Ok(Some(TickerResolution::new(spec, ticker, true)));
        }

        if let Some(spec) = entry.instrument_at(days) {
            let ticker = render(&TickerTemplate::new(spec.ticker.as_str()))?;
            return Ok(Some(TickerResolution::new(spec, ticker, false)));
        }

        if let Some(template) = &entry.standard_template {
            let spec = InstrumentSpec::term(
                id.clone(),
                tenor,
                entry.default_class(),
                template.as_str(),
            );
            let ticker = render(template)?;
            return Ok(Some(TickerResolution::new(spec, ticker, false)));
        }

        debug!("{}: no instrument for {}, skipped", id, tenor);
        Ok(None)
    }

    /// Resolves every request in a selection.
    ///
    /// Per-identifier failures are isolated in the plan; they never abort
    /// resolution of the other identifiers.
    pub fn plan(&self, requests: &[CurveRequest]) -> ResolutionPlan {
        let mut plan = ResolutionPlan::default();
        for request in requests {
            if plan.contains(&request.identifier) {
                continue;
            }
            let result = match &request.ladder {
                Some(ladder) => self.resolve(&request.identifier, ladder),
                None => self.resolve_default(&request.identifier),
            };
            match result {
                Ok(resolutions) => plan
                    .resolved
                    .push((request.identifier.clone(), resolutions)),
                Err(e) => {
                    plan.failures.insert(request.identifier.clone(), e);
                }
            }
        }
        plan
    }
}

fn check_ladder(id: &CurveId, ladder: &[Tenor]) -> CurveResult<()> {
    let mut seen = HashSet::new();
    for tenor in ladder {
        let days = tenor.to_days();
        if days == 0 {
            return Err(CurveError::configuration(
                id,
                format!("ladder tenor {} is not a term tenor", tenor),
            ));
        }
        if !seen.insert(days) {
            return Err(CurveError::configuration(
                id,
                format!("ladder repeats tenor {} ({} days)", tenor, days),
            ));
        }
    }
    Ok(())
}

fn ensure_unique_tickers(id: &CurveId, resolutions: &[TickerResolution]) -> CurveResult<()> {
    let mut seen: HashMap<&Ticker, &str> = HashMap::new();
    for r in resolutions {
        if let Some(prev) = seen.insert(&r.ticker, r.label()) {
            return Err(CurveError::configuration(
                id,
                format!("ticker {} resolved for both {} and {}", r.ticker, prev, r.label()),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// SELECTION PLAN
// =============================================================================

/// One identifier in a selection, with an optional explicit ladder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurveRequest {
    /// Identifier.
    pub identifier: CurveId,
    /// Ladder; `None` uses the catalog default.
    pub ladder: Option<Vec<Tenor>>,
}

impl CurveRequest {
    /// Request with the default ladder.
    pub fn new(identifier: impl Into<CurveId>) -> Self {
        Self {
            identifier: identifier.into(),
            ladder: None,
        }
    }

    /// Sets an explicit ladder.
    pub fn with_ladder(mut self, ladder: Vec<Tenor>) -> Self {
        self.ladder = Some(ladder);
        self
    }
}

/// Resolutions for a whole selection.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPlan {
    /// Resolved identifiers in request order.
    pub resolved: Vec<(CurveId, Vec<TickerResolution>)>,
    /// Identifiers that failed to resolve.
    pub failures: BTreeMap<CurveId, CurveError>,
}

impl ResolutionPlan {
    fn contains(&self, id: &CurveId) -> bool {
        self.failures.contains_key(id) || self.resolved.iter().any(|(r, _)| r == id)
    }

    /// Every ticker to fetch, de-duplicated, in first-seen order.
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut seen = HashSet::new();
        self.resolved
            .iter()
            .flat_map(|(_, rs)| rs.iter().map(|r| r.ticker.clone()))
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    /// Resolutions for one identifier.
    pub fn resolutions(&self, id: &CurveId) -> Option<&[TickerResolution]> {
        self.resolved
            .iter()
            .find(|(r, _)| r == id)
            .map(|(_, rs)| rs.as_slice())
    }

    /// True when nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_config::{AlternateConvention, CatalogEntry};
    use curvefeed_core::{Currency, CurrencyPair};
    use proptest::prelude::*;

    fn catalog() -> Arc<InstrumentCatalog> {
        Arc::new(InstrumentCatalog::standard().unwrap())
    }

    fn id(s: &str) -> CurveId {
        CurveId::new(s)
    }

    fn tickers(rs: &[TickerResolution]) -> Vec<&str> {
        rs.iter().map(|r| r.ticker.as_str()).collect()
    }

    #[test]
    fn test_standard_pair() {
        let resolver = TickerResolver::new(catalog());
        let rs = resolver
            .resolve(&id("EURUSD"), &[Tenor::Weeks(1), Tenor::Months(3), Tenor::Years(1)])
            .unwrap();
        assert_eq!(
            tickers(&rs),
            vec!["EURUSD Curncy", "EURUSD1W Curncy", "EURUSD3M Curncy", "EURUSD1Y Curncy"]
        );
        assert!(rs[0].is_anchor());
        assert!(rs.iter().all(|r| !r.uses_alternate_convention));
        assert_eq!(rs[2].tenor_days(), 90);
        assert_eq!(rs[2].label(), "3M");
    }

    #[test]
    fn test_alternate_convention_is_exclusive_and_clamped() {
        let resolver = TickerResolver::new(catalog());
        let ladder = Tenor::standard_forward_ladder();
        let rs = resolver.resolve(&id("USDINR"), &ladder).unwrap();

        assert_eq!(rs[0].ticker.as_str(), "USDINR Curncy");
        assert!(!rs[0].uses_alternate_convention);
        let terms = &rs[1..];
        assert!(terms.iter().all(|r| r.uses_alternate_convention));
        assert!(terms.iter().all(|r| r.ticker.as_str().starts_with("IRN")));
        assert!(terms.iter().all(|r| r.tenor_days() <= 180));
        // 1W 2W 1M 2M 3M 6M in coverage
        assert_eq!(rs.len(), 6 + 1);
        assert_eq!(terms[2].ticker.as_str(), "IRN1M Curncy");
    }

    #[test]
    fn test_empty_ladder_is_anchor_only() {
        let resolver = TickerResolver::new(catalog());
        let rs = resolver.resolve(&id("USDJPY"), &[]).unwrap();
        assert_eq!(tickers(&rs), vec!["USDJPY Curncy"]);
    }

    #[test]
    fn test_no_term_market_is_anchor_only() {
        let resolver = TickerResolver::new(catalog());
        let rs = resolver
            .resolve(&id("USDRUB"), &Tenor::standard_forward_ladder())
            .unwrap();
        assert_eq!(tickers(&rs), vec!["USDRUB Curncy"]);
    }

    #[test]
    fn test_unknown_identifier() {
        let resolver = TickerResolver::new(catalog());
        let err = resolver.resolve(&id("USDXYZ"), &[Tenor::Months(1)]).unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
    }

    #[test]
    fn test_malformed_ladders() {
        let resolver = TickerResolver::new(catalog());
        assert!(resolver
            .resolve(&id("EURUSD"), &[Tenor::Overnight])
            .is_err());
        assert!(resolver
            .resolve(&id("EURUSD"), &[Tenor::Years(1), Tenor::Months(12)])
            .is_err());
    }

    #[test]
    fn test_explicit_instruments_and_skips() {
        let resolver = TickerResolver::new(catalog());
        let rs = resolver
            .resolve(&id("USD_SOFR"), &[Tenor::Years(1), Tenor::Years(4), Tenor::Months(1)])
            .unwrap();
        // 4Y has no instrument and no template
        assert_eq!(
            tickers(&rs),
            vec!["SOFRRATE Index", "USOSFR1 Curncy", "USOSFRA Curncy"]
        );
        assert_eq!(rs[1].instrument.instrument_class, InstrumentClass::ForwardOrOis);
        assert_eq!(rs[0].instrument.instrument_class, InstrumentClass::MoneyMarket);
    }

    #[test]
    fn test_resolve_default_uses_catalog_ladder() {
        let resolver = TickerResolver::new(catalog());
        let rs = resolver.resolve_default(&id("USD_TERM_SOFR")).unwrap();
        assert_eq!(rs.len(), 5);
        let rs = resolver.resolve_default(&id("GBPUSD")).unwrap();
        assert_eq!(rs.len(), Tenor::standard_forward_ladder().len() + 1);
    }

    #[test]
    fn test_template_without_tenor_rejected() {
        let entry = CatalogEntry::fx(CurrencyPair::parse("USDTHB").unwrap())
            .with_alternate(AlternateConvention::new("THBNDF Curncy", Tenor::Years(1)));
        let catalog = InstrumentCatalog::from_entries(vec![entry]).unwrap();
        let resolver = TickerResolver::new(Arc::new(catalog));
        let err = resolver
            .resolve(&id("USDTHB"), &[Tenor::Months(1), Tenor::Months(3)])
            .unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
    }

    #[test]
    fn test_rates_template_with_pair_rejected() {
        let mut entry = CatalogEntry::rates("USD_X", Currency::USD, "SOFRRATE Index");
        entry.standard_template = Some(TickerTemplate::new("{pair}{tenor} Curncy"));
        let catalog = InstrumentCatalog::from_entries(vec![entry]).unwrap();
        let resolver = TickerResolver::new(Arc::new(catalog));
        assert!(resolver.resolve(&id("USD_X"), &[Tenor::Months(1)]).is_err());
    }

    #[test]
    fn test_plan_isolates_failures_and_dedups_tickers() {
        let resolver = TickerResolver::new(catalog());
        let plan = resolver.plan(&[
            CurveRequest::new("USD_SOFR").with_ladder(vec![Tenor::Years(1)]),
            CurveRequest::new("USDXYZ"),
            CurveRequest::new("USD_TREASURY").with_ladder(vec![Tenor::Years(2)]),
            CurveRequest::new("USD_SOFR"),
        ]);
        assert_eq!(plan.resolved.len(), 2);
        assert!(plan.failures.contains_key(&id("USDXYZ")));
        // Shared SOFRRATE anchor requested once
        let tickers = plan.tickers();
        assert_eq!(
            tickers.iter().filter(|t| t.as_str() == "SOFRRATE Index").count(),
            1
        );
        assert_eq!(tickers.len(), 3);
        assert_eq!(plan.resolutions(&id("USD_SOFR")).unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_alternate_never_exceeds_coverage(
            mask in proptest::collection::vec(any::<bool>(), 12)
        ) {
            let resolver = TickerResolver::new(catalog());
            let ladder: Vec<Tenor> = Tenor::standard_forward_ladder()
                .into_iter()
                .zip(mask)
                .filter_map(|(t, keep)| keep.then_some(t))
                .collect();
            for (pair, max_days) in [("USDINR", 180u32), ("USDMYR", 270), ("USDCOP", 1095)] {
                let rs = resolver.resolve(&id(pair), &ladder).unwrap();
                let in_coverage = ladder.iter().filter(|t| t.to_days() <= max_days).count();
                prop_assert_eq!(rs.len(), in_coverage + 1);
                for r in &rs[1..] {
                    prop_assert!(r.uses_alternate_convention);
                    prop_assert!(r.tenor_days() <= max_days);
                }
            }
        }
    }
}
