//! Quarry CLI - Command-line interface for Quarry.

use clap::Parser;

use quarry_cli::cli::{Cli, Command};
use quarry_cli::commands;
use quarry_cli::error::{CliError, CliResult};
use quarry_cli::output;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match &e {
            CliError::Query(err) => output::error(&err.display_full()),
            other => output::error(&other.to_string()),
        }
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    if cli.verbose {
        quarry_query::init_with_level("debug");
    } else {
        quarry_query::init_logging();
    }

    match cli.command {
        Command::Schema(args) => commands::schema::run(args).await,
        Command::Filter(args) => commands::filter::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
