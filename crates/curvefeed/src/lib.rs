//! # Curvefeed
//!
//! FX forward and rate curves built from batched reference-data quotes.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`core`]: identifiers, currencies, tenors, raw quotes
//! - [`config`]: the instrument catalog and settings
//! - [`traits`]: the [`QuoteSource`](traits::QuoteSource) seam and gateway wire types
//! - [`curves`]: ticker resolution, reconciliation, normalization, assembly
//! - [`engine`]: refresh cycles with supersession
//! - [`file`]: file-backed and in-memory quote sources
//! - `gateway` (feature `gateway`): the HTTP reference-data client
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use curvefeed::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = StaticQuoteSource::with_quotes([
//!     RawQuote::priced("USDJPY Curncy", 110.0),
//!     RawQuote::priced("USDJPY1Y Curncy", 25.0),
//! ]);
//! let engine = CurveEngine::builder()
//!     .with_quote_source(Arc::new(source))
//!     .build()
//!     .unwrap();
//!
//! let selection = Selection::of(["USDJPY"]).with_ladder(&[Tenor::Years(1)]);
//! let outcome = engine.refresh(&selection).await.unwrap();
//! let snapshot = outcome.snapshot().unwrap();
//! let curve = snapshot.curve(&CurveId::new("USDJPY")).unwrap();
//! assert!((curve.points[1].derived_rate - 110.25).abs() < 1e-12);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use curvefeed_config as config;
pub use curvefeed_core as core;
pub use curvefeed_curves as curves;
pub use curvefeed_engine as engine;
pub use curvefeed_ext_file as file;
pub use curvefeed_traits as traits;

#[cfg(feature = "gateway")]
#[cfg_attr(docsrs, doc(cfg(feature = "gateway")))]
pub use curvefeed_ext_gateway as gateway;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use curvefeed_config::prelude::*;
    pub use curvefeed_core::prelude::*;
    pub use curvefeed_curves::prelude::*;
    pub use curvefeed_engine::prelude::*;
    pub use curvefeed_ext_file::{create_file_quote_source, StaticQuoteSource};
    pub use curvefeed_traits::{QuoteBatch, QuoteRequest, QuoteSource, TraitError};

    #[cfg(feature = "gateway")]
    pub use curvefeed_ext_gateway::GatewayQuoteSource;
}
