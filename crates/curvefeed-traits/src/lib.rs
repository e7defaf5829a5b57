//! # Curvefeed Traits
//!
//! Trait definitions for the Curvefeed pipeline's external collaborators.
//!
//! This crate contains ONLY trait, request/response and wire-format definitions.
//! Implementations live in the extension crates:
//!
//! - `curvefeed-ext-gateway`: HTTP reference-data gateway
//! - `curvefeed-ext-file`: JSON/CSV snapshots and in-memory sources
//!
//! ## Dependency Injection
//!
//! ```ignore
//! CurveEngineBuilder::new()
//!     .with_catalog(catalog)
//!     .with_quote_source(impl QuoteSource)
//!     .build()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;
pub mod wire;

// Re-export commonly used types
pub use error::TraitError;
pub use market_data::{QuoteBatch, QuoteField, QuoteRequest, QuoteSource, SourceType};
pub use wire::{FieldValue, ReferenceData, ReferenceResponse, SecurityData};
