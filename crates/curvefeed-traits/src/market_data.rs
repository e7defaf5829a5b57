//! Quote source traits.
//!
//! A [`QuoteSource`] answers one batched reference-data request. Sources are
//! snapshot-only: one request in, one response out, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use curvefeed_core::{RawQuote, Ticker};

use crate::error::TraitError;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (reference-data gateway, REST APIs)
    Snapshot,
    /// File-based (CSV, JSON)
    File,
    /// In-memory / manual entry
    Manual,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Snapshot => "snapshot",
            SourceType::File => "file",
            SourceType::Manual => "manual",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Reference-data field mnemonics understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteField {
    /// Last price / rate (primary field)
    PxLast,
    /// Bid
    PxBid,
    /// Ask
    PxAsk,
    /// Last update time
    LastUpdate,
}

impl QuoteField {
    /// Wire mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            QuoteField::PxLast => "PX_LAST",
            QuoteField::PxBid => "PX_BID",
            QuoteField::PxAsk => "PX_ASK",
            QuoteField::LastUpdate => "LAST_UPDATE",
        }
    }

    /// Parses a wire mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PX_LAST" => Some(QuoteField::PxLast),
            "PX_BID" => Some(QuoteField::PxBid),
            "PX_ASK" => Some(QuoteField::PxAsk),
            "LAST_UPDATE" => Some(QuoteField::LastUpdate),
            _ => None,
        }
    }

    /// Default field set: last, bid, ask and last update.
    pub fn defaults() -> Vec<QuoteField> {
        vec![
            QuoteField::PxLast,
            QuoteField::PxBid,
            QuoteField::PxAsk,
            QuoteField::LastUpdate,
        ]
    }
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// One batched quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Securities, unique, in first-seen order.
    pub securities: Vec<Ticker>,
    /// Field mnemonics.
    pub fields: Vec<String>,
}

impl QuoteRequest {
    /// Builds a request, dropping repeated tickers while keeping first-seen order.
    pub fn new(securities: impl IntoIterator<Item = Ticker>, fields: &[QuoteField]) -> Self {
        let mut seen = HashSet::new();
        let securities = securities
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        Self {
            securities,
            fields: fields.iter().map(|f| f.mnemonic().to_string()).collect(),
        }
    }

    /// Builds a request with raw field mnemonics.
    pub fn with_field_names(
        securities: impl IntoIterator<Item = Ticker>,
        fields: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut request = Self::new(securities, &[]);
        request.fields = fields.into_iter().collect();
        request
    }

    /// Number of securities.
    pub fn len(&self) -> usize {
        self.securities.len()
    }

    /// True when nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Splits into sub-requests of at most `size` securities.
    pub fn chunks(&self, size: usize) -> Vec<QuoteRequest> {
        let size = size.max(1);
        self.securities
            .chunks(size)
            .map(|chunk| QuoteRequest {
                securities: chunk.to_vec(),
                fields: self.fields.clone(),
            })
            .collect()
    }
}

/// Quotes returned for a request.
///
/// Order follows the source; tickers the source does not know may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    /// Returned quotes.
    pub quotes: Vec<RawQuote>,
}

impl QuoteBatch {
    /// Creates a batch.
    pub fn new(quotes: Vec<RawQuote>) -> Self {
        Self { quotes }
    }

    /// Appends another batch.
    pub fn extend(&mut self, other: QuoteBatch) {
        self.quotes.extend(other.quotes);
    }

    /// First quote whose ticker matches exactly.
    pub fn get(&self, ticker: &Ticker) -> Option<&RawQuote> {
        self.quotes.iter().find(|q| &q.ticker == ticker)
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Quotes as a slice.
    pub fn as_slice(&self) -> &[RawQuote] {
        &self.quotes
    }
}

// =============================================================================
// QUOTE SOURCE
// =============================================================================

/// Trait for batched reference-data providers.
///
/// A source either answers the whole request or fails it; it never returns
/// a partial batch alongside an error.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Human-readable source name for logs.
    fn name(&self) -> &str {
        "quote-source"
    }

    /// Fetch quotes for every security in the request.
    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<QuoteBatch, TraitError>;
}
