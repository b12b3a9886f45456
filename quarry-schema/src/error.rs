//! Error types for schema loading and configuration.
//!
//! Parsing schema text never fails: malformed blocks and fields are dropped.
//! Errors only come from the file system and from `quarry.toml`.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while loading schemas or configuration.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file or directory.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(quarry::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The schema path does not exist.
    #[error("schema not found: {path}")]
    #[diagnostic(
        code(quarry::schema::not_found),
        help("set `schema.path` in quarry.toml or pass --schema")
    )]
    SchemaNotFound { path: String },

    /// A reload was requested before anything was loaded.
    #[error("schema registry has no source to reload")]
    #[diagnostic(code(quarry::schema::nothing_loaded))]
    NothingLoaded,

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(quarry::schema::config_error))]
    ConfigError { message: String },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(quarry::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },
}

impl SchemaError {
    /// Create an I/O error for a path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::SchemaNotFound {
            path: path.as_ref().display().to_string(),
        }
    }
}
