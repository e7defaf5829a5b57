//! Resolve command implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvefeed_curves::{ResolutionPlan, TickerResolver};

use super::{curve_ids, selection, Context};
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_error, print_header, print_info, print_json_value, print_output};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Identifiers (e.g., EURUSD USDINR USD_SOFR)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Tenor ladder applied to every identifier (e.g., 1M,3M,6M,1Y)
    #[arg(short, long)]
    pub ladder: Option<String>,
}

/// One resolved ticker.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ResolutionRow {
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "Tenor")]
    pub label: String,
    #[tabled(rename = "Days")]
    pub days: u32,
    #[tabled(rename = "Ticker")]
    pub ticker: String,
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Convention")]
    pub convention: String,
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    tickers: Vec<String>,
    resolutions: &'a [ResolutionRow],
    failures: BTreeMap<String, String>,
}

/// Flattens a plan into display rows, anchor first per identifier.
pub fn rows(plan: &ResolutionPlan) -> Vec<ResolutionRow> {
    plan.resolved
        .iter()
        .flat_map(|(id, resolutions)| {
            resolutions.iter().map(move |r| ResolutionRow {
                identifier: id.to_string(),
                label: r.label().to_string(),
                days: r.tenor_days(),
                ticker: r.ticker.to_string(),
                class: r.instrument.instrument_class.name().to_string(),
                convention: if r.is_anchor() {
                    "anchor"
                } else if r.uses_alternate_convention {
                    "alternate"
                } else {
                    "standard"
                }
                .to_string(),
            })
        })
        .collect()
}

/// Executes the resolve command.
pub fn execute(args: ResolveArgs, ctx: &Context) -> anyhow::Result<()> {
    let ids = curve_ids(&args.ids);
    let selection = selection(&ids, args.ladder.as_deref())?;
    let resolver = TickerResolver::new(Arc::clone(&ctx.catalog));
    let plan = resolver.plan(&selection.requests);
    let rows = rows(&plan);

    if ctx.format == OutputFormat::Json {
        print_json_value(&ResolveReport {
            tickers: plan.tickers().iter().map(|t| t.to_string()).collect(),
            resolutions: &rows,
            failures: plan
                .failures
                .iter()
                .map(|(id, e)| (id.to_string(), e.to_string()))
                .collect(),
        })?;
    } else {
        if ctx.decorate() {
            print_header("Ticker resolution");
        }
        print_output(&rows, ctx.format)?;
        for error in plan.failures.values() {
            print_error(&error.to_string());
        }
        if ctx.decorate() {
            print_info(&format!(
                "{} unique tickers for {} identifiers",
                plan.tickers().len(),
                plan.resolved.len()
            ));
        }
    }

    if plan.is_empty() && !plan.failures.is_empty() {
        return Err(CliError::Config("no identifier could be resolved".into()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_config::InstrumentCatalog;
    use curvefeed_core::{CurveId, Tenor};
    use curvefeed_curves::CurveRequest;

    #[test]
    fn test_rows_mark_conventions() {
        let resolver = TickerResolver::new(Arc::new(InstrumentCatalog::standard().unwrap()));
        let plan = resolver.plan(&[
            CurveRequest::new(CurveId::new("USDINR"))
                .with_ladder(vec![Tenor::Months(1), Tenor::Years(1)]),
            CurveRequest::new(CurveId::new("EURUSD")).with_ladder(vec![Tenor::Months(1)]),
        ]);
        let rows = rows(&plan);

        let conventions: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.ticker.as_str(), r.convention.as_str()))
            .collect();
        assert_eq!(
            conventions,
            vec![
                ("USDINR Curncy", "anchor"),
                ("IRN1M Curncy", "alternate"),
                ("EURUSD Curncy", "anchor"),
                ("EURUSD1M Curncy", "standard"),
            ]
        );
    }
}
