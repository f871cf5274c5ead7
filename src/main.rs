//! table-cleaner command-line interface
//!
//! ```bash
//! table-cleaner inspect sales.xlsx --sheet Q1
//! table-cleaner clean sales.csv --skip-rows 2 --sort revenue:desc --format csv
//! table-cleaner combine jan.csv feb.csv --source-column month
//! ```
//!
//! Set RUST_LOG=debug (or pass -v) for detection and per-step logging.

mod cli;

use clap::Parser;
use cli::args::Cli;
use table_cleaner::CleanerError;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("table_cleaner={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = cli::commands::run(cli.command) {
        eprintln!("error: {:#}", err);
        if let Some(hint) = err.downcast_ref::<CleanerError>().and_then(|e| e.hint()) {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
    Ok(())
}
