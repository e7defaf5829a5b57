//! Coverage command implementation.
//!
//! Runs one cycle over a set of identifiers (by default every entry with a
//! term market) and reports how far each curve's valid data reaches.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvefeed_config::PairCategory;
use curvefeed_curves::{CoverageTier, Curve};
use curvefeed_engine::CurveSnapshot;

use super::catalog::CategoryArg;
use super::curve::run_cycle;
use super::Context;
use crate::output::{print_header, print_output, print_success, print_warning, KeyValue};

/// Arguments for the coverage command.
#[derive(Args)]
pub struct CoverageArgs {
    /// Identifiers to assess; defaults to every catalog entry with a term market
    pub ids: Vec<String>,

    /// Restrict the default set to one category
    #[arg(long, value_enum, conflicts_with = "ids")]
    pub category: Option<CategoryArg>,

    /// Tenor ladder applied to every identifier
    #[arg(short, long)]
    pub ladder: Option<String>,

    /// Read quotes from a JSON or CSV file instead of the gateway
    #[arg(long)]
    pub quotes: Option<PathBuf>,
}

/// Coverage of one identifier.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CoverageRow {
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[tabled(rename = "Valid")]
    pub valid: String,
    #[tabled(rename = "Coverage")]
    pub coverage: String,
    #[tabled(rename = "Longest")]
    pub longest: String,
    #[tabled(rename = "NDF")]
    pub alternate: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Curve> for CoverageRow {
    fn from(curve: &Curve) -> Self {
        let quality = &curve.data_quality;
        Self {
            identifier: curve.identifier.to_string(),
            tier: quality.tier.name().to_string(),
            valid: format!("{}/{}", quality.valid_points, quality.requested_points),
            coverage: format!("{}%", quality.coverage_pct),
            longest: quality.longest_tenor.clone().unwrap_or_else(|| "-".into()),
            alternate: if curve.uses_alternate_convention { "yes" } else { "no" }.into(),
            status: if quality.low_coverage { "low" } else { "ok" }.into(),
        }
    }
}

/// Rows for every requested identifier, failures included, in request order.
pub fn coverage_rows(snapshot: &CurveSnapshot) -> Vec<CoverageRow> {
    snapshot
        .requested
        .iter()
        .map(|id| match (snapshot.curve(id), snapshot.failure(id)) {
            (Some(curve), _) => CoverageRow::from(curve),
            (None, failure) => CoverageRow {
                identifier: id.to_string(),
                tier: "-".into(),
                valid: "0".into(),
                coverage: "0%".into(),
                longest: "-".into(),
                alternate: "-".into(),
                status: failure
                    .map(|f| format!("failed while {}", f.stage))
                    .unwrap_or_else(|| "missing".into()),
            },
        })
        .collect()
}

/// Curve counts per tier, best first.
pub fn tier_counts(snapshot: &CurveSnapshot) -> Vec<(CoverageTier, usize)> {
    CoverageTier::ALL
        .iter()
        .map(|&tier| {
            let n = snapshot
                .curves
                .values()
                .filter(|c| c.data_quality.tier == tier)
                .count();
            (tier, n)
        })
        .collect()
}

fn default_ids(ctx: &Context, category: Option<CategoryArg>) -> Vec<String> {
    let wanted = category.map(PairCategory::from);
    ctx.catalog
        .iter()
        .filter(|entry| entry.has_term_market())
        .filter(|entry| wanted.is_none() || entry.category == wanted)
        .map(|entry| entry.identifier.to_string())
        .collect()
}

/// Executes the coverage command.
pub async fn execute(args: CoverageArgs, ctx: &Context) -> anyhow::Result<()> {
    let ids = if args.ids.is_empty() {
        default_ids(ctx, args.category)
    } else {
        args.ids
    };
    if ids.is_empty() {
        print_warning("nothing to assess");
        return Ok(());
    }

    let snapshot = run_cycle(ctx, &ids, args.ladder.as_deref(), args.quotes.as_ref()).await?;
    let rows = coverage_rows(&snapshot);

    if ctx.decorate() {
        print_header(&format!("Coverage ({} identifiers)", rows.len()));
    }
    print_output(&rows, ctx.format)?;

    if ctx.decorate() {
        let mut summary: Vec<KeyValue> = tier_counts(&snapshot)
            .into_iter()
            .map(|(tier, n)| KeyValue::new(tier.name(), n.to_string()))
            .collect();
        summary.push(KeyValue::new("Failed", snapshot.failures.len().to_string()));
        print_header("By tier");
        print_output(&summary, ctx.format)?;
        print_success(&format!(
            "{} tickers requested, {} quotes received",
            snapshot.tickers_requested, snapshot.quotes_received
        ));
    }
    Ok(())
}
