//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CatalogArgs, CoverageArgs, CurveArgs, NdfCheckArgs, ResolveArgs};

/// Curvefeed - FX forward and rate curve construction
#[derive(Parser)]
#[command(name = "curvefeed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (TOML)
    #[arg(short, long, env = "CURVEFEED_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run one refresh cycle and print the resulting curves
    Curve(CurveArgs),

    /// Show the tickers a selection resolves to, without fetching
    Resolve(ResolveArgs),

    /// Browse the instrument catalog
    Catalog(CatalogArgs),

    /// Report coverage tiers for a set of curves
    Coverage(CoverageArgs),

    /// Check which NDF ticker formats are quoted for a pair, and how far out
    NdfCheck(NdfCheckArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (one line per curve)
    Minimal,
}
