//! In-memory quote source.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use curvefeed_core::{RawQuote, Ticker};
use curvefeed_traits::error::TraitError;
use curvefeed_traits::market_data::*;

/// Quote source backed by an in-memory table.
///
/// Quotes can be changed between cycles, and the source can be told to fail
/// every request, which makes it the usual stand-in for the gateway in tests
/// and demos.
#[derive(Debug, Default)]
pub struct StaticQuoteSource {
    quotes: DashMap<Ticker, RawQuote>,
    failure: Mutex<Option<TraitError>>,
    requests: Mutex<Vec<QuoteRequest>>,
}

impl StaticQuoteSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `quotes`. Later duplicates replace earlier ones.
    pub fn with_quotes(quotes: impl IntoIterator<Item = RawQuote>) -> Self {
        let source = Self::new();
        for quote in quotes {
            source.set(quote);
        }
        source
    }

    /// Inserts or replaces a quote.
    pub fn set(&self, quote: RawQuote) {
        self.quotes.insert(quote.ticker.clone(), quote);
    }

    /// Removes a ticker.
    pub fn remove(&self, ticker: &Ticker) -> Option<RawQuote> {
        self.quotes.remove(ticker).map(|(_, q)| q)
    }

    /// Makes every request fail with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<TraitError>) {
        *self.failure.lock() = error;
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.lock().clone()
    }

    /// Number of loaded tickers.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
        self.requests.lock().push(request.clone());
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        Ok(QuoteBatch::new(
            request
                .securities
                .iter()
                .filter_map(|t| self.quotes.get(t).map(|q| q.clone()))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tickers: &[&str]) -> QuoteRequest {
        QuoteRequest::new(tickers.iter().map(|t| Ticker::new(*t)), &[QuoteField::PxLast])
    }

    #[tokio::test]
    async fn test_answers_known_tickers() {
        let source = StaticQuoteSource::with_quotes(vec![
            RawQuote::priced("EURUSD Curncy", 1.085),
            RawQuote::priced("EURUSD Curncy", 1.086),
        ]);
        assert_eq!(source.len(), 1);
        let batch = source
            .fetch_quotes(&request(&["EURUSD Curncy", "GBPUSD Curncy"]))
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.as_slice()[0].primary_value(), Some(1.086));
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let source = StaticQuoteSource::new();
        source.fail_with(Some(TraitError::Timeout));
        assert_eq!(
            source.fetch_quotes(&request(&["A"])).await.unwrap_err(),
            TraitError::Timeout
        );
        source.fail_with(None);
        assert!(source.fetch_quotes(&request(&["A"])).await.unwrap().is_empty());
    }
}
