//! CLI command implementations.

pub mod catalog;
pub mod coverage;
pub mod curve;
pub mod ndf_check;
pub mod resolve;

pub use catalog::CatalogArgs;
pub use coverage::CoverageArgs;
pub use curve::CurveArgs;
pub use ndf_check::NdfCheckArgs;
pub use resolve::ResolveArgs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use tracing::debug;

use curvefeed_config::{InstrumentCatalog, Settings};
use curvefeed_core::{CurveId, Tenor};
use curvefeed_engine::{CurveEngine, Selection};
use curvefeed_ext_file::create_file_quote_source;
use curvefeed_ext_gateway::GatewayQuoteSource;
use curvefeed_traits::QuoteSource;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// State shared by every command: output options, settings and the catalog.
pub struct Context {
    pub format: OutputFormat,
    pub quiet: bool,
    pub settings: Settings,
    pub catalog: Arc<InstrumentCatalog>,
}

impl Context {
    /// Loads settings (defaults when no file is given) and the catalog they name.
    pub fn load(format: OutputFormat, quiet: bool, config: Option<&Path>) -> anyhow::Result<Self> {
        let settings = match config {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        let catalog = settings
            .load_catalog()
            .map_err(|e| CliError::Config(e.to_string()))?;
        debug!(entries = catalog.len(), "catalog loaded");
        Ok(Self {
            format,
            quiet,
            settings,
            catalog: Arc::new(catalog),
        })
    }

    /// True when decorative table-mode output should be printed.
    pub fn decorate(&self) -> bool {
        self.format == OutputFormat::Table && !self.quiet
    }

    /// A quote file when given, otherwise the configured gateway.
    pub fn quote_source(&self, quotes: Option<&PathBuf>) -> CliResult<Arc<dyn QuoteSource>> {
        match quotes {
            Some(path) => {
                create_file_quote_source(path).map_err(|e| CliError::Source(e.to_string()))
            }
            None => {
                let gateway = GatewayQuoteSource::new(self.settings.gateway.clone())
                    .map_err(|e| CliError::Source(e.to_string()))?;
                Ok(Arc::new(gateway))
            }
        }
    }

    /// Builds an engine over the loaded catalog.
    pub fn engine(&self, quotes: Option<&PathBuf>) -> CliResult<CurveEngine> {
        CurveEngine::builder()
            .with_catalog(Arc::clone(&self.catalog))
            .with_quote_source(self.quote_source(quotes)?)
            .with_settings(self.settings.engine.clone())
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

/// Parses an optional comma-separated ladder.
pub fn parse_ladder(ladder: Option<&str>) -> CliResult<Option<Vec<Tenor>>> {
    match ladder {
        None => Ok(None),
        Some(s) => {
            let tenors = Tenor::parse_ladder(s).map_err(|_| CliError::InvalidLadder(s.into()))?;
            if tenors.is_empty() {
                return Err(CliError::InvalidLadder(s.into()));
            }
            Ok(Some(tenors))
        }
    }
}

/// Normalizes identifiers as typed on the command line.
pub fn curve_ids(ids: &[String]) -> Vec<CurveId> {
    ids.iter()
        .map(|id| CurveId::new(id.trim().to_ascii_uppercase()))
        .collect()
}

/// Builds a selection from identifiers and an optional ladder.
pub fn selection(ids: &[CurveId], ladder: Option<&str>) -> CliResult<Selection> {
    let selection = Selection::of(ids.iter().cloned());
    Ok(match parse_ladder(ladder)? {
        Some(tenors) => selection.with_ladder(&tenors),
        None => selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ladder() {
        assert_eq!(parse_ladder(None).unwrap(), None);
        assert_eq!(
            parse_ladder(Some("1M, 3M,1Y")).unwrap(),
            Some(vec![Tenor::Months(1), Tenor::Months(3), Tenor::Years(1)])
        );
        assert!(matches!(
            parse_ladder(Some("1M,XQ")),
            Err(CliError::InvalidLadder(_))
        ));
        assert!(parse_ladder(Some(" , ")).is_err());
    }

    #[test]
    fn test_curve_ids_uppercased() {
        let ids = curve_ids(&["eurusd".into(), " USD_SOFR ".into()]);
        assert_eq!(ids, vec![CurveId::new("EURUSD"), CurveId::new("USD_SOFR")]);
    }

    #[test]
    fn test_selection_applies_ladder() {
        let ids = curve_ids(&["EURUSD".into(), "USDJPY".into()]);
        let selection = selection(&ids, Some("1M,3M")).unwrap();
        assert_eq!(selection.len(), 2);
        assert!(selection
            .requests
            .iter()
            .all(|r| r.ladder.as_deref() == Some(&[Tenor::Months(1), Tenor::Months(3)][..])));
    }
}
