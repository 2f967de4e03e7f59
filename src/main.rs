mod cli;
mod error;
mod export;
mod flow;
mod fmt;
mod importer;
mod models;
mod palette;
mod settings;
mod tree;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{Result, SankeyError};

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| SankeyError::Logging(e.to_string()))
}

fn main() {
    let cli = Cli::parse();

    let result = init_logging(cli.verbose).and_then(|()| match cli.command {
        Commands::Render(args) => cli::render::run(args, cli.verbose),
        Commands::Config { init } => cli::config::run(init),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
