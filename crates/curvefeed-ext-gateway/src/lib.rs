//! # Curvefeed Ext Gateway
//!
//! Quote source for the HTTP reference-data gateway.
//!
//! One [`QuoteRequest`](curvefeed_traits::QuoteRequest) becomes one or more
//! `POST {base_url}/api/bloomberg/reference` calls with a JSON body
//! `{"securities": [...], "fields": [...]}` and an optional bearer token.
//! Any transport error, non-2xx status, unparseable body or `success: false`
//! fails the whole fetch.
//!
//! ```ignore
//! use curvefeed_config::GatewaySettings;
//! use curvefeed_ext_gateway::GatewayQuoteSource;
//!
//! let source = GatewayQuoteSource::new(GatewaySettings::default())?;
//! let engine = CurveEngine::builder()
//!     .with_quote_source(Arc::new(source))
//!     .build()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod transport;

pub use client::GatewayQuoteSource;
pub use transport::{
    HttpAuth, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
