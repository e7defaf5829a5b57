//! # Curvefeed Core
//!
//! Core domain types for the Curvefeed curve-construction pipeline.
//!
//! - **Currencies**: [`Currency`] and [`CurrencyPair`] with pip-factor rules
//! - **Tenors**: [`Tenor`] labels and their calendar-day equivalents
//! - **Instruments**: [`InstrumentSpec`] and [`InstrumentClass`]
//! - **Quotes**: [`RawQuote`] as returned by a reference-data source
//!
//! ## Example
//!
//! ```rust
//! use curvefeed_core::prelude::*;
//!
//! let pair = CurrencyPair::parse("USDJPY").unwrap();
//! assert_eq!(pair.pip_factor(), 100.0);
//! assert_eq!(Tenor::parse("18M").unwrap().to_days(), 545);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod currency;
pub mod error;
pub mod ids;
pub mod instrument;
pub mod quote;
pub mod tenor;

pub use currency::{Currency, CurrencyPair};
pub use error::{CoreError, CoreResult};
pub use ids::{CurveId, Ticker};
pub use instrument::{InstrumentClass, InstrumentSpec};
pub use quote::{QuoteFields, RawQuote};
pub use tenor::{years_from_days, Tenor};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::currency::{Currency, CurrencyPair};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::ids::{CurveId, Ticker};
    pub use crate::instrument::{InstrumentClass, InstrumentSpec};
    pub use crate::quote::{QuoteFields, RawQuote};
    pub use crate::tenor::Tenor;
}
