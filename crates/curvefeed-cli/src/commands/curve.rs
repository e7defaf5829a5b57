//! Curve command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvefeed_curves::{Curve, CurvePoint};
use curvefeed_engine::{CommitOutcome, CurveSnapshot};

use super::{curve_ids, selection, Context};
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{
    format_opt, format_percent, print_error, print_header, print_info, print_json_value,
    print_output, print_warning,
};

/// Arguments for the curve command.
#[derive(Args)]
pub struct CurveArgs {
    /// Identifiers (e.g., EURUSD USDJPY USD_SOFR)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Tenor ladder applied to every identifier (e.g., 1M,3M,6M,1Y)
    #[arg(short, long)]
    pub ladder: Option<String>,

    /// Read quotes from a JSON or CSV file instead of the gateway
    #[arg(long)]
    pub quotes: Option<PathBuf>,
}

/// One curve point.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PointRow {
    #[tabled(rename = "Curve")]
    pub curve: String,
    #[tabled(rename = "Tenor")]
    pub label: String,
    #[tabled(rename = "Days")]
    pub days: u32,
    #[tabled(rename = "Ticker")]
    pub ticker: String,
    #[tabled(rename = "Raw")]
    pub raw: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Points")]
    pub points: String,
    #[tabled(rename = "Yield")]
    pub implied_yield: String,
    #[tabled(rename = "Bid")]
    pub bid: String,
    #[tabled(rename = "Ask")]
    pub ask: String,
}

impl PointRow {
    fn new(curve: &Curve, point: &CurvePoint) -> Self {
        Self {
            curve: curve.identifier.to_string(),
            label: point.label.clone(),
            days: point.tenor_days,
            ticker: point.ticker.to_string(),
            raw: format_opt(Some(point.raw_value), 6),
            rate: format_opt(Some(point.derived_rate), 6),
            points: format_opt(point.derived_points, 4),
            implied_yield: format_percent(point.implied_yield),
            bid: format_opt(point.bid, 6),
            ask: format_opt(point.ask, 6),
        }
    }
}

/// One-line summary of a curve.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CurveSummary {
    #[tabled(rename = "Curve")]
    pub identifier: String,
    #[tabled(rename = "Points")]
    pub points: usize,
    #[tabled(rename = "Coverage")]
    pub coverage_pct: u32,
    #[tabled(rename = "Tier")]
    pub tier: String,
}

impl From<&Curve> for CurveSummary {
    fn from(curve: &Curve) -> Self {
        Self {
            identifier: curve.identifier.to_string(),
            points: curve.len(),
            coverage_pct: curve.data_quality.coverage_pct,
            tier: curve.data_quality.tier.name().to_string(),
        }
    }
}

/// Runs one committed cycle and returns its snapshot.
pub async fn run_cycle(
    ctx: &Context,
    ids: &[String],
    ladder: Option<&str>,
    quotes: Option<&PathBuf>,
) -> anyhow::Result<Arc<CurveSnapshot>> {
    let ids = curve_ids(ids);
    let selection = selection(&ids, ladder)?;
    let engine = ctx.engine(quotes)?;

    let outcome = engine
        .refresh(&selection)
        .await
        .map_err(|e| CliError::Refresh(e.to_string()))?;
    match outcome {
        CommitOutcome::Committed(snapshot) => Ok(snapshot),
        CommitOutcome::Superseded { cycle_id, latest } => Err(CliError::Refresh(format!(
            "cycle {} superseded by {}",
            cycle_id, latest
        ))
        .into()),
    }
}

/// Executes the curve command.
pub async fn execute(args: CurveArgs, ctx: &Context) -> anyhow::Result<()> {
    let snapshot = run_cycle(ctx, &args.ids, args.ladder.as_deref(), args.quotes.as_ref()).await?;

    match ctx.format {
        OutputFormat::Json => print_json_value(snapshot.as_ref())?,
        OutputFormat::Minimal => {
            let summaries: Vec<CurveSummary> =
                snapshot.ordered_curves().map(CurveSummary::from).collect();
            print_output(&summaries, ctx.format)?;
        }
        OutputFormat::Csv => {
            let rows: Vec<PointRow> = snapshot
                .ordered_curves()
                .flat_map(|curve| curve.points.iter().map(move |p| PointRow::new(curve, p)))
                .collect();
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Table => {
            for curve in snapshot.ordered_curves() {
                if ctx.decorate() {
                    let quality = &curve.data_quality;
                    print_header(&format!(
                        "{}  {}/{} points, {}% coverage, {}",
                        curve.identifier,
                        quality.valid_points,
                        quality.requested_points,
                        quality.coverage_pct,
                        quality.tier
                    ));
                }
                let rows: Vec<PointRow> =
                    curve.points.iter().map(|p| PointRow::new(curve, p)).collect();
                print_output(&rows, ctx.format)?;
                if curve.data_quality.low_coverage {
                    print_warning(&format!("{}: low coverage", curve.identifier));
                }
                if curve.uses_alternate_convention && ctx.decorate() {
                    print_info(&format!("{}: built from NDF tickers", curve.identifier));
                }
            }
        }
    }

    for (id, failure) in &snapshot.failures {
        print_error(&format!("{}: {}", id, failure));
    }
    if snapshot.is_empty() && !snapshot.failures.is_empty() {
        return Err(CliError::Refresh("no curves built".into()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_core::{CurveId, Ticker};
    use curvefeed_curves::{CoverageTier, DataQuality};

    fn point(label: &str, days: u32, points: Option<f64>) -> CurvePoint {
        CurvePoint {
            tenor_days: days,
            tenor_years: days as f64 / 365.0,
            raw_value: 1.085,
            derived_rate: 1.085,
            derived_points: points,
            implied_yield: 0.0,
            label: label.into(),
            ticker: Ticker::new(format!("EURUSD{} Curncy", label)),
            bid: None,
            ask: Some(1.0851),
            last_update: None,
            is_anchor: days == 0,
        }
    }

    #[test]
    fn test_point_row_formatting() {
        let curve = Curve {
            identifier: CurveId::new("EURUSD"),
            points: vec![point("Spot", 0, None), point("1M", 30, Some(9.8))],
            data_quality: DataQuality {
                valid_points: 2,
                requested_points: 2,
                coverage_pct: 100,
                low_coverage: false,
                tier: CoverageTier::PartialShort,
                longest_tenor: Some("1M".into()),
            },
            uses_alternate_convention: false,
        };
        let row = PointRow::new(&curve, &curve.points[1]);
        assert_eq!(row.curve, "EURUSD");
        assert_eq!(row.points, "9.8000");
        assert_eq!(row.bid, "-");
        assert_eq!(row.ask, "1.085100");
        assert_eq!(row.implied_yield, "0.0000%");

        let summary = CurveSummary::from(&curve);
        assert_eq!(summary.points, 2);
        assert_eq!(summary.tier, "Partial (<2Y)");
    }
}
