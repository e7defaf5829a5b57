//! Reference-data gateway response format.
//!
//! Shared by the HTTP gateway client and the file sources that read saved
//! gateway responses. The request body is a serialized
//! [`QuoteRequest`](crate::QuoteRequest).
//!
//! ```json
//! {
//!   "success": true,
//!   "data": {
//!     "securitiesData": [
//!       { "security": "EURUSD Curncy", "success": true,
//!         "fields": { "PX_LAST": 1.085, "PX_BID": "1.0849", "LAST_UPDATE": "16:59:58" } }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use curvefeed_core::{QuoteFields, RawQuote, Ticker};

use crate::error::TraitError;
use crate::market_data::{QuoteBatch, QuoteField};

/// One field value as the gateway sends it.
///
/// Numbers may arrive as JSON numbers or numeric strings; placeholders such
/// as `"#N/A"` are text that does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON number.
    Number(f64),
    /// JSON string.
    Text(String),
    /// JSON boolean.
    Bool(bool),
    /// JSON null.
    Null,
    /// Anything else (arrays, objects).
    #[serde(skip_serializing)]
    Other(IgnoredAny),
}

impl FieldValue {
    /// The value as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The value as text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One security's entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityData {
    /// Ticker as echoed by the gateway.
    pub security: String,
    /// Per-security success flag.
    #[serde(default = "default_true")]
    pub success: bool,
    /// Field values by mnemonic.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Per-security error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SecurityData {
    fn number(&self, field: QuoteField) -> Option<f64> {
        self.fields.get(field.mnemonic()).and_then(FieldValue::as_f64)
    }

    /// Converts to a raw quote. The ticker is kept byte-for-byte.
    pub fn into_raw_quote(self) -> RawQuote {
        let fields = QuoteFields {
            last: self.number(QuoteField::PxLast),
            bid: self.number(QuoteField::PxBid),
            ask: self.number(QuoteField::PxAsk),
            last_update: self
                .fields
                .get(QuoteField::LastUpdate.mnemonic())
                .and_then(FieldValue::as_text),
        };
        RawQuote {
            ticker: Ticker::new(self.security),
            success: self.success,
            fields,
        }
    }
}

/// Response payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Per-security entries.
    #[serde(default, alias = "securitiesData")]
    pub securities_data: Vec<SecurityData>,
}

/// Top-level gateway response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceResponse {
    /// Batch-level success flag.
    pub success: bool,
    /// Payload.
    #[serde(default)]
    pub data: Option<ReferenceData>,
    /// Batch-level error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReferenceResponse {
    /// Parses a response body.
    pub fn from_json(body: &str) -> Result<Self, TraitError> {
        serde_json::from_str(body).map_err(|e| TraitError::ParseError(e.to_string()))
    }

    /// Converts to a batch, failing if the gateway reported failure.
    pub fn into_batch(self) -> Result<QuoteBatch, TraitError> {
        if !self.success {
            return Err(TraitError::Rejected(
                self.error
                    .unwrap_or_else(|| "gateway reported failure".to_string()),
            ));
        }
        Ok(QuoteBatch::new(
            self.data
                .unwrap_or_default()
                .securities_data
                .into_iter()
                .map(SecurityData::into_raw_quote)
                .collect(),
        ))
    }
}
