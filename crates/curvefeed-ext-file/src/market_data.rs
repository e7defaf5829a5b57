//! File-based quote sources.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use curvefeed_core::{QuoteFields, RawQuote, Ticker};
use curvefeed_traits::error::TraitError;
use curvefeed_traits::market_data::*;
use curvefeed_traits::wire::{FieldValue, ReferenceResponse};

/// Quote table shared by the file sources.
///
/// The first quote loaded for a ticker wins. A reload builds the new map
/// before taking the write lock, so a concurrent fetch sees either the old
/// table or the new one in full.
#[derive(Debug, Default)]
struct QuoteTable {
    quotes: RwLock<HashMap<Ticker, RawQuote>>,
}

impl QuoteTable {
    fn replace(&self, quotes: impl IntoIterator<Item = RawQuote>) -> usize {
        let mut fresh = HashMap::new();
        for quote in quotes {
            match fresh.entry(quote.ticker.clone()) {
                Entry::Occupied(_) => warn!("duplicate quote for {} ignored", quote.ticker),
                Entry::Vacant(slot) => {
                    slot.insert(quote);
                }
            }
        }
        let count = fresh.len();
        *self.quotes.write() = fresh;
        count
    }

    fn len(&self) -> usize {
        self.quotes.read().len()
    }

    /// Quotes for the requested tickers, in request order; unknown tickers
    /// are omitted.
    fn answer(&self, request: &QuoteRequest) -> QuoteBatch {
        let quotes = self.quotes.read();
        QuoteBatch::new(
            request
                .securities
                .iter()
                .filter_map(|t| quotes.get(t).cloned())
                .collect(),
        )
    }
}

// =============================================================================
// CSV QUOTE SOURCE
// =============================================================================

/// CSV record for quotes.
///
/// Numeric columns are read as text so placeholders such as `#N/A` load as
/// absent values instead of failing the file.
#[derive(Debug, Deserialize)]
struct QuoteRecord {
    ticker: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    last: Option<String>,
    #[serde(default)]
    bid: Option<String>,
    #[serde(default)]
    ask: Option<String>,
    #[serde(default)]
    last_update: Option<String>,
}

fn numeric(value: Option<String>) -> Option<f64> {
    value.and_then(|v| FieldValue::Text(v).as_f64())
}

impl From<QuoteRecord> for RawQuote {
    fn from(record: QuoteRecord) -> Self {
        RawQuote {
            ticker: Ticker::new(record.ticker),
            success: record.success.unwrap_or(true),
            fields: QuoteFields {
                last: numeric(record.last),
                bid: numeric(record.bid),
                ask: numeric(record.ask),
                last_update: record.last_update.filter(|s| !s.trim().is_empty()),
            },
        }
    }
}

/// CSV-based quote source for testing and end-of-day snapshots.
///
/// Columns: `ticker,success,last,bid,ask,last_update`; all but `ticker` may
/// be empty.
pub struct CsvQuoteSource {
    file_path: PathBuf,
    table: QuoteTable,
}

impl CsvQuoteSource {
    /// Create a new CSV quote source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            table: QuoteTable::default(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload quotes from file. A missing file leaves the source empty.
    pub fn reload(&self) -> Result<usize, TraitError> {
        if !self.file_path.exists() {
            debug!("{} not found, quote source is empty", self.file_path.display());
            return Ok(self.table.replace(Vec::new()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut quotes = Vec::new();
        for result in reader.deserialize() {
            let record: QuoteRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            quotes.push(RawQuote::from(record));
        }
        Ok(self.table.replace(quotes))
    }

    /// Number of loaded tickers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

#[async_trait]
impl QuoteSource for CsvQuoteSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
        Ok(self.table.answer(request))
    }
}

// =============================================================================
// JSON QUOTE SOURCE
// =============================================================================

/// Accepted JSON layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    /// A saved gateway response.
    Gateway(ReferenceResponse),
    /// `{"quotes": [...]}`.
    Batch(QuoteBatch),
    /// A bare array of quotes.
    Quotes(Vec<RawQuote>),
}

/// JSON-based quote source.
///
/// Reads a saved gateway response (either `securitiesData` spelling), a
/// serialized [`QuoteBatch`], or a bare array of quotes.
pub struct JsonQuoteSource {
    file_path: PathBuf,
    table: QuoteTable,
}

impl JsonQuoteSource {
    /// Create a new JSON quote source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            table: QuoteTable::default(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Parses a snapshot held in memory.
    pub fn parse(content: &str) -> Result<Vec<RawQuote>, TraitError> {
        let file: SnapshotFile =
            serde_json::from_str(content).map_err(|e| TraitError::ParseError(e.to_string()))?;
        match file {
            SnapshotFile::Gateway(response) => Ok(response.into_batch()?.quotes),
            SnapshotFile::Batch(batch) => Ok(batch.quotes),
            SnapshotFile::Quotes(quotes) => Ok(quotes),
        }
    }

    /// Reload quotes from file. A missing file leaves the source empty.
    pub fn reload(&self) -> Result<usize, TraitError> {
        if !self.file_path.exists() {
            debug!("{} not found, quote source is empty", self.file_path.display());
            return Ok(self.table.replace(Vec::new()));
        }

        let content = std::fs::read_to_string(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;
        Ok(self.table.replace(Self::parse(&content)?))
    }

    /// Number of loaded tickers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

#[async_trait]
impl QuoteSource for JsonQuoteSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    fn name(&self) -> &str {
        "json"
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
        Ok(self.table.answer(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn request(tickers: &[&str]) -> QuoteRequest {
        QuoteRequest::new(
            tickers.iter().map(|t| Ticker::new(*t)),
            &QuoteField::defaults(),
        )
    }

    fn write(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_csv_source() {
        let file = write(
            ".csv",
            "ticker,success,last,bid,ask,last_update\n\
             EURUSD Curncy,true,1.0850,1.0849,1.0851,16:59:58\n\
             EURUSD1M Curncy,,9.8,,,\n\
             EURUSD3M Curncy,true,#N/A,,,\n\
             EURUSD6M Curncy,false,,,,\n",
        );
        let source = CsvQuoteSource::new(file.path()).unwrap();
        assert_eq!(source.len(), 4);

        let batch = source
            .fetch_quotes(&request(&["EURUSD1M Curncy", "EURUSD Curncy", "EURUSD9M Curncy"]))
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.as_slice()[0].ticker.as_str(), "EURUSD1M Curncy");
        assert!(batch.as_slice()[0].success);
        assert_eq!(batch.as_slice()[1].fields.bid, Some(1.0849));

        let batch = source
            .fetch_quotes(&request(&["EURUSD3M Curncy", "EURUSD6M Curncy"]))
            .await
            .unwrap();
        assert_eq!(batch.as_slice()[0].primary_value(), None);
        assert!(!batch.as_slice()[1].success);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let source = CsvQuoteSource::new("/nonexistent/quotes.csv").unwrap();
        assert!(source.is_empty());
        let source = JsonQuoteSource::new("/nonexistent/quotes.json").unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_csv_reload_replaces() {
        let file = write(".csv", "ticker,last\nA Curncy,1.0\n");
        let source = CsvQuoteSource::new(file.path()).unwrap();
        assert_eq!(source.len(), 1);

        std::fs::write(file.path(), "ticker,last\nB Curncy,2.0\nC Curncy,3.0\n").unwrap();
        assert_eq!(source.reload().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_json_gateway_layout() {
        let file = write(
            ".json",
            r#"{"success": true, "data": {"securities_data": [
                {"security": "USDJPY Curncy", "success": true, "fields": {"PX_LAST": "150.25"}},
                {"security": "USDJPY1M Curncy", "success": true, "fields": {"PX_LAST": -55.0}}
            ]}}"#,
        );
        let source = JsonQuoteSource::new(file.path()).unwrap();
        let batch = source
            .fetch_quotes(&request(&["USDJPY Curncy"]))
            .await
            .unwrap();
        assert_eq!(batch.as_slice()[0].primary_value(), Some(150.25));
    }

    #[test]
    fn test_json_other_layouts() {
        let quotes = JsonQuoteSource::parse(
            r#"[{"ticker": "A Curncy", "success": true, "fields": {"last": 1.5}}]"#,
        )
        .unwrap();
        assert_eq!(quotes[0].primary_value(), Some(1.5));

        let quotes = JsonQuoteSource::parse(
            r#"{"quotes": [{"ticker": "B Curncy", "success": false, "fields": {}}]}"#,
        )
        .unwrap();
        assert!(!quotes[0].success);
    }

    #[test]
    fn test_json_rejected_response_fails_load() {
        let err = JsonQuoteSource::parse(r#"{"success": false, "error": "expired"}"#).unwrap_err();
        assert_eq!(err, TraitError::Rejected("expired".into()));
        assert!(JsonQuoteSource::parse("not json").is_err());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let table = QuoteTable::default();
        table.replace(vec![
            RawQuote::priced("A Curncy", 1.0),
            RawQuote::priced("A Curncy", 2.0),
        ]);
        let batch = table.answer(&request(&["A Curncy"]));
        assert_eq!(batch.as_slice()[0].primary_value(), Some(1.0));
    }

    #[test]
    fn test_reload_is_never_seen_half_done() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        fn generation(prefix: &str, px: f64) -> Vec<RawQuote> {
            (0..200)
                .map(|i| RawQuote::priced(format!("{prefix}{i} Curncy"), px))
                .collect()
        }

        let table = Arc::new(QuoteTable::default());
        table.replace(generation("A", 1.0));

        let all: Vec<String> = (0..200)
            .flat_map(|i| [format!("A{i} Curncy"), format!("B{i} Curncy")])
            .collect();
        let all: Vec<&str> = all.iter().map(String::as_str).collect();
        let req = request(&all);

        let done = Arc::new(AtomicBool::new(false));
        let writer = {
            let (table, done) = (Arc::clone(&table), Arc::clone(&done));
            std::thread::spawn(move || {
                for round in 0..200 {
                    if round % 2 == 0 {
                        table.replace(generation("B", 2.0));
                    } else {
                        table.replace(generation("A", 1.0));
                    }
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        while !done.load(Ordering::SeqCst) {
            let batch = table.answer(&req);
            assert_eq!(batch.len(), 200);
            let first = batch.as_slice()[0].primary_value();
            assert!(batch.as_slice().iter().all(|q| q.primary_value() == first));
        }
        writer.join().unwrap();
    }
}
