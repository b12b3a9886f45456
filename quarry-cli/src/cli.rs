//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Quarry CLI - schema inspection and filter compilation
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "Quarry CLI - schema inspection and filter compilation", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse schema files and summarize models and enums
    Schema(SchemaArgs),

    /// Compile query parameters into a filter tree
    Filter(FilterArgs),

    /// Display version information
    Version,
}

/// Options shared by commands that read `quarry.toml`
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to the config file (defaults to ./quarry.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environment override table to apply
    #[arg(long, env = "QUARRY_ENV")]
    pub env: Option<String>,
}

// =============================================================================
// Schema Command
// =============================================================================

/// Arguments for the `schema` command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema file or directory
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the parsed document as JSON
    #[arg(long)]
    pub json: bool,
}

// =============================================================================
// Filter Command
// =============================================================================

/// Arguments for the `filter` command
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Urlencoded query string, e.g. `age__gt=25&name__icontains=jo`
    pub query: Option<String>,

    /// JSON parameter files, merged in order before the query string
    #[arg(short, long = "params")]
    pub params: Vec<PathBuf>,

    /// Derive field classification from this model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Schema file or directory used with --model
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Database provider (postgresql, mysql, sqlite, mongodb, sqlserver, cockroachdb)
    #[arg(long)]
    pub provider: Option<String>,

    /// Fail on keys with an empty field path
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
