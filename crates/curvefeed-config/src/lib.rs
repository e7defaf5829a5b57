//! Curvefeed Configuration Layer
//!
//! Static configuration for the curve-construction pipeline:
//!
//! - **Instrument catalog**: per-identifier anchor ticker, term instruments and
//!   ticker templates ([`InstrumentCatalog`], [`CatalogEntry`])
//! - **Alternate conventions**: NDF ticker families with their coverage limit
//!   ([`AlternateConvention`])
//! - **Settings**: engine and gateway settings loaded from TOML ([`Settings`])
//!
//! # Example
//!
//! ```rust
//! use curvefeed_config::InstrumentCatalog;
//! use curvefeed_core::CurveId;
//!
//! let catalog = InstrumentCatalog::standard().unwrap();
//! let inr = catalog.get(&CurveId::new("USDINR")).unwrap();
//! assert_eq!(inr.active_alternate().unwrap().format.as_str(), "IRN{tenor} Curncy");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod settings;
pub mod standard;
pub mod template;

pub use catalog::{
    AlternateConvention, CatalogEntry, CatalogInstrument, CurveKind, InstrumentCatalog,
    PairCategory,
};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use settings::{EngineSettings, GatewaySettings, Settings};
pub use template::{TemplateContext, TickerTemplate};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{AlternateConvention, CatalogEntry, CurveKind, InstrumentCatalog};
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::settings::Settings;
    pub use crate::template::TickerTemplate;
}
