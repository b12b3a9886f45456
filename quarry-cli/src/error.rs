//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

use quarry_query::QueryError;
use quarry_schema::SchemaError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(quarry::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(quarry::config))]
    Config(String),

    /// Schema loading error
    #[error("Schema error: {0}")]
    #[diagnostic(code(quarry::schema))]
    Schema(#[from] SchemaError),

    /// Filter compilation error
    #[error("Filter error: {0}")]
    #[diagnostic(code(quarry::filter))]
    Query(#[from] QueryError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    #[diagnostic(code(quarry::json))]
    Json(#[from] serde_json::Error),

    /// Command error
    #[error("Command error: {0}")]
    #[diagnostic(code(quarry::command))]
    Command(String),
}
