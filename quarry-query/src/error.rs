//! Error types for filter compilation.
//!
//! Compilation is lenient by default: keys that cannot be compiled are
//! dropped and logged. Errors are only produced in strict mode, when a
//! provider name is unknown, and when decoding parameter documents.
//!
//! Every error carries a stable `Q`-prefixed code. The leading digit groups
//! them: `1` for keys, `5` for values, `6` for documents and `7` for
//! configuration.
//!
//! ```rust
//! use quarry_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::empty_path("__gt");
//! assert_eq!(err.code, ErrorCode::InvalidFilter);
//! assert!(err.to_string().starts_with("[Q1003]"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A key that does not tokenize into a usable triple.
    InvalidFilter,
    /// A value the compiler cannot use.
    InvalidParameter,
    /// A parameter document that is not a JSON object.
    DeserializationError,
    /// A compiler setting that cannot be honored.
    InvalidConfiguration,
}

impl ErrorCode {
    fn number(self) -> u16 {
        match self {
            Self::InvalidFilter => 1003,
            Self::InvalidParameter => 5003,
            Self::DeserializationError => 6003,
            Self::InvalidConfiguration => 7001,
        }
    }

    /// The code as printed, e.g. `Q1003`.
    pub fn code(&self) -> String {
        format!("Q{}", self.number())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// Where an error happened and what to do about it.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The raw parameter key, when one is involved.
    pub key: Option<String>,
    /// A concrete fix, e.g. a corrected key.
    pub hint: Option<String>,
    /// Longer explanatory text.
    pub help: Option<String>,
}

/// An error raised while compiling filters.
#[derive(Error, Debug)]
pub struct QueryError {
    pub code: ErrorCode,
    pub message: String,
    pub context: ErrorContext,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl QueryError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.context.key = Some(key.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.context.hint = Some(hint.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// A key such as `__in` whose operator has no field in front of it.
    pub fn empty_path(key: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("filter key '{key}' has no field path");
        let op = key.trim_start_matches('_');
        let hint = (!op.is_empty()).then(|| format!("name a field first, e.g. `field__{op}`"));

        let mut err = Self::new(ErrorCode::InvalidFilter, message);
        err.context.hint = hint;
        err.with_key(key)
    }

    pub fn invalid_parameter(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::InvalidParameter,
            format!("invalid value for '{key}': {reason}"),
        )
        .with_key(key)
    }

    /// A parameter document that is not a JSON object of keys to values.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DeserializationError,
            format!("failed to decode query parameters: {}", message.into()),
        )
        .with_help("parameters must be a JSON object keyed by filter key")
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    pub fn is_invalid_filter(&self) -> bool {
        self.code == ErrorCode::InvalidFilter
    }

    /// Multi-line rendering for terminals, including the key, hint and help.
    pub fn display_full(&self) -> String {
        let mut lines = vec![format!("error[{}]: {}", self.code, self.message)];
        if let Some(key) = &self.context.key {
            lines.push(format!("  key: {key}"));
        }
        if let Some(hint) = &self.context.hint {
            lines.push(format!("  hint: {hint}"));
        }
        if let Some(help) = &self.context.help {
            lines.push(format!("  help: {help}"));
        }
        lines.join("\n")
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        let mut wrapped = Self::deserialization(err.to_string());
        wrapped.source = Some(Box::new(err));
        wrapped
    }
}
