pub mod config;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::importer::NumberFormat;

#[derive(Parser)]
#[command(
    name = "category-sankey",
    version,
    about = "Category totals and Sankey flow diagrams from category-path ledger exports."
)]
pub struct Cli {
    /// Log pipeline details to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate one or more CSV exports and draw the money flow.
    Render(RenderArgs),
    /// Show the effective settings.
    Config {
        /// Write a settings file with the defaults if none exists yet.
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// One or more CSV exports (semicolon separated)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Divisor for values (e.g. 12 to show monthly averages from a one year export)
    #[arg(long, default_value_t = 1.0)]
    pub div: f64,

    /// Lower threshold for categories to show up
    #[arg(long, default_value_t = 0.0)]
    pub threshold: f64,

    /// Write the diagram as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the diagram as a standalone HTML page
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Write the HTML page to sankey-YYYY-MM-DD.html unless --html is given
    #[arg(long)]
    pub plot: bool,

    /// Diagram title
    #[arg(long, default_value = "Money flow")]
    pub title: String,

    /// Read files with identical contents only once
    #[arg(long = "skip-duplicates")]
    pub skip_duplicates: bool,

    /// Skip the category table
    #[arg(short, long)]
    pub quiet: bool,

    /// CSV column holding the category path
    #[arg(long = "category-column")]
    pub category_column: Option<String>,

    /// CSV column holding the amount
    #[arg(long = "amount-column")]
    pub amount_column: Option<String>,

    /// Number format of the amount column
    #[arg(long = "number-format", value_enum)]
    pub number_format: Option<NumberFormat>,

    /// Currency symbol used in labels
    #[arg(long)]
    pub currency: Option<String>,
}
