//! Raw quotes as returned by a reference-data source.

use serde::{Deserialize, Serialize};

use crate::ids::Ticker;

/// Field values carried by a raw quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFields {
    /// Last traded/quoted value (the primary field).
    pub last: Option<f64>,
    /// Bid.
    pub bid: Option<f64>,
    /// Ask.
    pub ask: Option<f64>,
    /// Source-formatted last update timestamp.
    pub last_update: Option<String>,
}

/// One security's entry in a quote response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Ticker exactly as echoed by the source.
    pub ticker: Ticker,
    /// Per-security success flag.
    pub success: bool,
    /// Returned fields.
    pub fields: QuoteFields,
}

impl RawQuote {
    /// Creates a successful quote with only the last value set.
    pub fn priced(ticker: impl Into<Ticker>, last: f64) -> Self {
        Self {
            ticker: ticker.into(),
            success: true,
            fields: QuoteFields {
                last: Some(last),
                ..QuoteFields::default()
            },
        }
    }

    /// Creates a failed quote (security not found or not entitled).
    pub fn failed(ticker: impl Into<Ticker>) -> Self {
        Self {
            ticker: ticker.into(),
            success: false,
            fields: QuoteFields::default(),
        }
    }

    /// Sets bid and ask.
    #[must_use]
    pub fn with_bid_ask(mut self, bid: f64, ask: f64) -> Self {
        self.fields.bid = Some(bid);
        self.fields.ask = Some(ask);
        self
    }

    /// Sets the last update timestamp.
    #[must_use]
    pub fn with_last_update(mut self, last_update: impl Into<String>) -> Self {
        self.fields.last_update = Some(last_update.into());
        self
    }

    /// The usable primary value, if any.
    ///
    /// `None` when the security failed or its last value is missing or non-finite.
    #[must_use]
    pub fn primary_value(&self) -> Option<f64> {
        if !self.success {
            return None;
        }
        self.fields.last.filter(|v| v.is_finite())
    }
}
