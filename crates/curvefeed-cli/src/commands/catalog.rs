//! Catalog command implementation.

use std::sync::Arc;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use curvefeed_config::{CatalogEntry, CurveKind, PairCategory};
use curvefeed_core::CurveId;
use curvefeed_curves::TickerResolver;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_header, print_json_value, print_output, KeyValue};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List catalog entries
    List {
        /// Only entries in this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },

    /// Show one entry with its resolved default tickers
    Show {
        /// Identifier (e.g., USDINR, USD_SOFR)
        id: String,
    },
}

/// Category names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    G10,
    EmAsia,
    EmLatam,
    EmEmea,
    Crosses,
    Rates,
}

impl From<CategoryArg> for PairCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::G10 => PairCategory::G10,
            CategoryArg::EmAsia => PairCategory::EmAsia,
            CategoryArg::EmLatam => PairCategory::EmLatam,
            CategoryArg::EmEmea => PairCategory::EmEmea,
            CategoryArg::Crosses => PairCategory::Crosses,
            CategoryArg::Rates => PairCategory::Rates,
        }
    }
}

/// Catalog listing row.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CatalogRow {
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Anchor")]
    pub anchor: String,
    #[tabled(rename = "Tenors")]
    pub tenors: usize,
    #[tabled(rename = "Alternate")]
    pub alternate: String,
}

impl From<&CatalogEntry> for CatalogRow {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            identifier: entry.identifier.to_string(),
            category: category_name(entry),
            kind: kind_name(&entry.kind),
            anchor: entry.anchor_ticker.clone(),
            tenors: entry.ladder().len(),
            alternate: entry
                .active_alternate()
                .map(|alt| format!("{} to {}", alt.format, alt.max_tenor))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Default ticker row for `catalog show`.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct InstrumentRow {
    #[tabled(rename = "Tenor")]
    pub label: String,
    #[tabled(rename = "Days")]
    pub days: u32,
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Ticker")]
    pub ticker: String,
}

/// Category display name for an entry.
pub fn category_name(entry: &CatalogEntry) -> String {
    entry
        .category
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn kind_name(kind: &CurveKind) -> String {
    match kind {
        CurveKind::FxForward { pair } => format!("FX forward {}", pair),
        CurveKind::Rates { currency } => format!("Rates {}", currency),
    }
}

/// Executes the catalog command.
pub fn execute(args: CatalogArgs, ctx: &Context) -> anyhow::Result<()> {
    match args.command {
        CatalogCommand::List { category } => list(category, ctx),
        CatalogCommand::Show { id } => show(&id, ctx),
    }
}

fn list(category: Option<CategoryArg>, ctx: &Context) -> anyhow::Result<()> {
    let wanted = category.map(PairCategory::from);
    let rows: Vec<CatalogRow> = ctx
        .catalog
        .iter()
        .filter(|entry| wanted.is_none() || entry.category == wanted)
        .map(CatalogRow::from)
        .collect();

    if ctx.decorate() {
        let title = match wanted {
            Some(c) => format!("Catalog: {} ({} entries)", c, rows.len()),
            None => format!("Catalog ({} entries)", rows.len()),
        };
        print_header(&title);
    }
    print_output(&rows, ctx.format)
}

fn show(id: &str, ctx: &Context) -> anyhow::Result<()> {
    let id = CurveId::new(id.trim().to_ascii_uppercase());
    let entry = ctx
        .catalog
        .get(&id)
        .ok_or_else(|| CliError::UnknownIdentifier(id.to_string()))?;

    if ctx.format == OutputFormat::Json {
        return print_json_value(entry);
    }

    let resolver = TickerResolver::new(Arc::clone(&ctx.catalog));
    let rows: Vec<InstrumentRow> = resolver
        .resolve_default(&id)?
        .into_iter()
        .map(|r| InstrumentRow {
            label: r.label().to_string(),
            days: r.tenor_days(),
            class: r.instrument.instrument_class.name().to_string(),
            ticker: r.ticker.to_string(),
        })
        .collect();

    if ctx.decorate() {
        let mut details = vec![
            KeyValue::new("Identifier", entry.identifier.to_string()),
            KeyValue::new("Description", entry.description.clone()),
            KeyValue::new("Category", category_name(entry)),
            KeyValue::new("Kind", kind_name(&entry.kind)),
            KeyValue::new("Anchor", entry.anchor_ticker.clone()),
        ];
        if let Some(template) = &entry.standard_template {
            details.push(KeyValue::new("Template", template.to_string()));
        }
        if let Some(alt) = entry.active_alternate() {
            details.push(KeyValue::new(
                "Alternate",
                format!("{} (max {})", alt.format, alt.max_tenor),
            ));
        }
        print_header(&format!("{} catalog entry", entry.identifier));
        print_output(&details, ctx.format)?;
        print_header("Default tickers");
    }
    print_output(&rows, ctx.format)
}
