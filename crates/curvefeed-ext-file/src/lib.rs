//! # Curvefeed Ext File
//!
//! File-based and in-memory quote sources for the Curvefeed engine.
//!
//! This crate provides default implementations for testing, replays and
//! end-of-day snapshots:
//! - JSON quote source (saved gateway responses or serialized batches)
//! - CSV quote source
//! - In-memory quote source with a switchable failure mode
//!
//! For live quotes, use `curvefeed-ext-gateway`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod market_data;
mod memory;

pub use market_data::*;
pub use memory::*;

use std::path::Path;
use std::sync::Arc;

use curvefeed_traits::error::TraitError;
use curvefeed_traits::market_data::QuoteSource;

/// Create a file-based quote source, choosing the format from the extension.
///
/// `.csv` files load as CSV; everything else loads as JSON. Unlike the
/// sources themselves, this fails when the file does not exist.
pub fn create_file_quote_source(
    path: impl AsRef<Path>,
) -> Result<Arc<dyn QuoteSource>, TraitError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TraitError::SourceNotAvailable(format!(
            "quote file {} not found",
            path.display()
        )));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(Arc::new(CsvQuoteSource::new(path)?))
    } else {
        Ok(Arc::new(JsonQuoteSource::new(path)?))
    }
}
