//! Logging bootstrap for Quarry.
//!
//! Library code only emits `tracing` events. This module installs a
//! subscriber for binaries and tests that want to see them.
//!
//! # Environment Variables
//!
//! - `QUARRY_DEBUG=true|1|yes` - Enable debug logging
//! - `QUARRY_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific log level
//! - `QUARRY_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use quarry_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! The subscriber is only available with the `tracing-subscriber` feature;
//! without it `init` does nothing and events go to whatever subscriber the
//! application installs.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `QUARRY_DEBUG`.
///
/// Returns `true` if `QUARRY_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("QUARRY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Normalize a level name, or `None` if it is not one.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the configured log level from `QUARRY_LOG_LEVEL`.
///
/// Defaults to "debug" if `QUARRY_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    env::var("QUARRY_LOG_LEVEL")
        .ok()
        .and_then(|level| parse_level(&level))
        .unwrap_or_else(|| if is_debug_enabled() { "debug" } else { "warn" })
}

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    /// Read `QUARRY_LOG_FORMAT`. Unknown values fall back to JSON.
    pub fn from_env() -> Self {
        match env::var("QUARRY_LOG_FORMAT") {
            Ok(f) if f.eq_ignore_ascii_case("pretty") => Self::Pretty,
            Ok(f) if f.eq_ignore_ascii_case("compact") => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Get the configured log format name from `QUARRY_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    LogFormat::from_env().as_str()
}

/// Crates whose events pass the level filter.
const TARGETS: [&str; 4] = ["quarry", "quarry_query", "quarry_schema", "quarry_cli"];

/// Initialize the Quarry logging system.
///
/// Subsequent calls are no-ops. Nothing is installed unless `QUARRY_DEBUG`
/// or `QUARRY_LOG_LEVEL` is set.
pub fn init() {
    if !is_debug_enabled() && env::var("QUARRY_LOG_LEVEL").is_err() {
        return;
    }
    init_with_level(get_log_level());
}

/// Initialize logging at a fixed level, ignoring `QUARRY_LOG_LEVEL`.
///
/// Used by binaries that read the level from `quarry.toml` or a flag.
/// If the application already installed a global subscriber, that one is kept.
pub fn init_with_level(level: &str) {
    let level = parse_level(level).unwrap_or("warn");

    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let directives = TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(",");
            let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

            let format = LogFormat::from_env();
            let layer = fmt::layer().with_writer(std::io::stderr);
            let registry = tracing_subscriber::registry().with(filter);
            let installed = match format {
                LogFormat::Json => registry.with(layer.json()).try_init(),
                LogFormat::Compact => registry.with(layer.compact()).try_init(),
                LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::debug!(level, format = format.as_str(), "quarry logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = (level, TARGETS);
        }
    });
}

/// Debug logging gated on `QUARRY_DEBUG` at runtime.
#[macro_export]
macro_rules! quarry_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Trace logging gated on `QUARRY_DEBUG` at runtime.
#[macro_export]
macro_rules! quarry_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
