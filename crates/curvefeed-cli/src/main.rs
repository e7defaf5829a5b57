//! Curvefeed CLI - build FX forward and rate curves from reference-data quotes.
//!
//! # Usage
//!
//! ```bash
//! # Build forward curves from the gateway
//! curvefeed curve EURUSD USDJPY
//!
//! # Build from a saved quote file with a custom ladder
//! curvefeed curve USDINR --ladder 1M,3M,6M --quotes quotes.json
//!
//! # Show the tickers a selection would request
//! curvefeed resolve USDTWD --ladder 1M,1Y,2Y
//!
//! # Browse the instrument catalog
//! curvefeed catalog list --category em-asia
//! curvefeed catalog show USDBRL
//!
//! # Coverage tiers across the catalog
//! curvefeed coverage --quotes quotes.csv
//!
//! # Which NDF ticker formats are quoted, and to which tenor
//! curvefeed ndf-check USDINR USDKRW --formats "NKW{tenor} Curncy,KWN{tenor} Curncy"
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table/json output stays clean on stdout
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::load(cli.format, cli.quiet, cli.config.as_deref())?;

    match cli.command {
        Commands::Curve(args) => commands::curve::execute(args, &ctx).await?,
        Commands::Resolve(args) => commands::resolve::execute(args, &ctx)?,
        Commands::Catalog(args) => commands::catalog::execute(args, &ctx)?,
        Commands::Coverage(args) => commands::coverage::execute(args, &ctx).await?,
        Commands::NdfCheck(args) => commands::ndf_check::execute(args, &ctx).await?,
    }

    Ok(())
}
