//! # Curvefeed Curves
//!
//! Turns catalog configuration plus a batch of raw reference-data quotes into
//! ordered, validated curves.
//!
//! ```text
//! catalog + ladder ──► TickerResolver ──► tickers ──► (quote source)
//!                                                          │
//!        Curve ◄── CurveAssembler ◄── normalizer ◄── reconciler ◄── raw quotes
//! ```
//!
//! - [`resolver`]: identifier + ladder → tickers, standard vs. alternate (NDF)
//! - [`reconciler`]: exact-ticker matching and anchor isolation
//! - [`normalizer`]: points vs. rate by convention, pip factors, implied yield
//! - [`assembler`]: filtering, tenor ordering, data-quality scoring
//! - [`pipeline`]: the post-fetch chain for one identifier
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use curvefeed_config::InstrumentCatalog;
//! use curvefeed_core::{CurveId, RawQuote, Tenor};
//! use curvefeed_curves::prelude::*;
//!
//! let catalog = Arc::new(InstrumentCatalog::standard().unwrap());
//! let id = CurveId::new("USDJPY");
//! let kind = catalog.get(&id).unwrap().kind;
//! let resolutions = TickerResolver::new(catalog)
//!     .resolve(&id, &[Tenor::Years(1)])
//!     .unwrap();
//!
//! let quotes = vec![
//!     RawQuote::priced("USDJPY Curncy", 110.0),
//!     RawQuote::priced("USDJPY1Y Curncy", 25.0),
//! ];
//! let curve = CurvePipeline::default()
//!     .build(&id, &kind, &resolutions, &QuoteIndex::new(&quotes))
//!     .unwrap();
//! assert!((curve.points[1].derived_rate - 110.25).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod curve;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod quality;
pub mod reconciler;
pub mod resolver;

pub use assembler::CurveAssembler;
pub use curve::{Curve, CurvePoint};
pub use error::{CurveError, CurveResult};
pub use normalizer::{normalize, NormalizedValue};
pub use pipeline::{CurvePipeline, PipelineStage};
pub use quality::{CoverageTier, DataQuality};
pub use reconciler::{reconcile, QuoteIndex, ReconciledQuotes};
pub use resolver::{CurveRequest, ResolutionPlan, TickerResolution, TickerResolver};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assembler::CurveAssembler;
    pub use crate::curve::{Curve, CurvePoint};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::pipeline::CurvePipeline;
    pub use crate::quality::{CoverageTier, DataQuality};
    pub use crate::reconciler::QuoteIndex;
    pub use crate::resolver::{CurveRequest, TickerResolution, TickerResolver};
}
