//! # Curvefeed Engine
//!
//! Runs refresh cycles: resolve a selection, fetch every ticker in one
//! batched request, then build each identifier's curve independently.
//!
//! ## Architecture
//!
//! ```text
//!  Selection ──► TickerResolver ──► QuoteRequest (deduplicated tickers)
//!                                        │
//!                                        ▼
//!                                   QuoteSource
//!                                        │
//!               ┌────────────────────────┼────────────────────────┐
//!               ▼                        ▼                        ▼
//!         CurvePipeline            CurvePipeline            CurvePipeline
//!         (identifier A)           (identifier B)               ...
//!               └────────────────────────┼────────────────────────┘
//!                                        ▼
//!                                  CurveSnapshot
//!                                        │
//!                                        ▼
//!          RefreshController (latest cycle per slot) ──► watch subscribers
//! ```
//!
//! A failing quote request fails the cycle as a whole. Unknown identifiers,
//! unusable ladders and missing anchors only remove the affected identifier
//! from the snapshot.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use curvefeed_engine::prelude::*;
//!
//! let engine = Arc::new(
//!     CurveEngine::builder()
//!         .with_quote_source(Arc::new(source))
//!         .build()?,
//! );
//!
//! let mut updates = engine.controller().subscribe();
//! engine.spawn_refresh(Selection::of(["EURUSD", "USDJPY"]));
//! updates.changed().await?;
//! ```
//!
//! ## Features
//!
//! - `parallel`: build identifiers on the rayon pool. Output is identical to
//!   the sequential build.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod refresh;
pub mod snapshot;

pub use builder::CurveEngineBuilder;
pub use cycle::{CycleFailure, CycleStage, Selection, SelectionKey};
pub use engine::CurveEngine;
pub use error::{EngineError, EngineResult};
pub use refresh::{CommitOutcome, CycleTicket, RefreshController};
pub use snapshot::CurveSnapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::CurveEngineBuilder;
    pub use crate::cycle::{CycleStage, Selection, SelectionKey};
    pub use crate::engine::CurveEngine;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::refresh::{CommitOutcome, RefreshController};
    pub use crate::snapshot::CurveSnapshot;
}
