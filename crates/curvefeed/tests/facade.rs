//! The facade prelude is enough to drive a full refresh.

use std::sync::Arc;

use approx::assert_relative_eq;
use curvefeed::prelude::*;

#[tokio::test]
async fn test_refresh_through_prelude() {
    let source = Arc::new(StaticQuoteSource::with_quotes([
        RawQuote::priced("EURUSD Curncy", 1.0850),
        RawQuote::priced("EURUSD1M Curncy", 9.8),
        RawQuote::priced("SOFRRATE Index", 5.31),
        RawQuote::priced("USOSFRA Curncy", 5.33),
    ]));
    let engine = CurveEngine::builder()
        .with_quote_source(source.clone())
        .build()
        .unwrap();

    let selection = Selection::new(vec![
        CurveRequest::new(CurveId::new("EURUSD")).with_ladder(vec![Tenor::Months(1)]),
        CurveRequest::new(CurveId::new("USD_SOFR")).with_ladder(vec![Tenor::Months(1)]),
    ]);
    let outcome = engine.refresh(&selection).await.unwrap();
    assert!(outcome.is_committed());

    let snapshot = engine.controller().snapshot(&SelectionKey::default()).unwrap();
    let eur = snapshot.curve(&CurveId::new("EURUSD")).unwrap();
    assert_relative_eq!(eur.points[1].derived_rate, 1.08598, epsilon = 1e-12);

    let sofr = snapshot.curve(&CurveId::new("USD_SOFR")).unwrap();
    assert_eq!(sofr.points[1].derived_points, None);
    assert_relative_eq!(sofr.points[1].implied_yield, 5.33);

    // One batched request for both identifiers
    assert_eq!(source.requests().len(), 1);
    assert_eq!(source.requests()[0].len(), 4);
}

#[test]
fn test_catalog_reachable() {
    let catalog = InstrumentCatalog::standard().unwrap();
    assert!(catalog.contains(&CurveId::new("USDJPY")));
    assert!(catalog.contains(&CurveId::new("USD_SOFR")));
}
