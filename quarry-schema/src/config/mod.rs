//! Configuration file parsing for `quarry.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{SchemaError, SchemaResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "quarry.toml";

static ENV_VAR_PATTERN: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// Main configuration structure for `quarry.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuarryConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema location.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Filter compilation settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl QuarryConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let expanded = expand_env_vars(content);

        toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })
    }

    /// Load `quarry.toml` from a directory if it exists, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment-specific overrides.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(db) = overrides.database {
                if let Some(provider) = db.provider {
                    self.database.provider = provider;
                }
            }
            if let Some(schema) = overrides.schema {
                if let Some(path) = schema.path {
                    self.schema.path = path;
                }
                if let Some(extensions) = schema.extensions {
                    self.schema.extensions = extensions;
                }
            }
            if let Some(filter) = overrides.filter {
                if let Some(strict) = filter.strict {
                    self.filter.strict = strict;
                }
                if let Some(ignore_keys) = filter.ignore_keys {
                    self.filter.ignore_keys = ignore_keys;
                }
            }
            if let Some(debug) = overrides.debug {
                if let Some(level) = debug.log_level {
                    self.debug.log_level = level;
                }
            }
        }
        self
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Storage backend the compiled filters are meant for.
    #[serde(default)]
    pub provider: DatabaseProvider,
}

/// Supported database providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    /// PostgreSQL.
    #[default]
    #[serde(alias = "postgres")]
    PostgreSql,
    /// MySQL / MariaDB.
    MySql,
    /// SQLite.
    #[serde(alias = "sqlite3")]
    Sqlite,
    /// MongoDB.
    #[serde(alias = "mongo")]
    MongoDb,
    /// Microsoft SQL Server.
    #[serde(alias = "mssql")]
    SqlServer,
    /// CockroachDB.
    CockroachDb,
}

impl DatabaseProvider {
    /// Get the provider name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::MongoDb => "mongodb",
            Self::SqlServer => "sqlserver",
            Self::CockroachDb => "cockroachdb",
        }
    }

    /// Parse a provider name, accepting the same aliases as the config file.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Some(Self::PostgreSql),
            "mysql" => Some(Self::MySql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            "mongodb" | "mongo" => Some(Self::MongoDb),
            "sqlserver" | "mssql" => Some(Self::SqlServer),
            "cockroachdb" => Some(Self::CockroachDb),
            _ => None,
        }
    }

    /// Whether string filters may carry a case `mode`.
    pub fn supports_insensitive_mode(&self) -> bool {
        matches!(self, Self::PostgreSql | Self::CockroachDb | Self::MongoDb)
    }

    /// All providers.
    pub fn all() -> &'static [DatabaseProvider] {
        &[
            Self::PostgreSql,
            Self::MySql,
            Self::Sqlite,
            Self::MongoDb,
            Self::SqlServer,
            Self::CockroachDb,
        ]
    }
}

impl std::fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Schema file or directory.
    #[serde(default = "default_schema_path")]
    pub path: String,

    /// Extensions collected when `path` is a directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
            extensions: default_extensions(),
        }
    }
}

fn default_schema_path() -> String {
    "./prisma".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["prisma".to_string()]
}

/// Filter compilation settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Reject keys with an empty field path instead of dropping them.
    #[serde(default)]
    pub strict: bool,

    /// Parameter keys that are never compiled into the filter (pagination etc).
    #[serde(default)]
    pub ignore_keys: Vec<String>,

    /// Field classification used for value coercion.
    #[serde(default)]
    pub fields: FieldListsConfig,
}

/// Field names per coercion category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldListsConfig {
    /// Fields parsed as timestamps.
    #[serde(default)]
    pub date: Vec<String>,

    /// Fields parsed as booleans.
    #[serde(default)]
    pub boolean: Vec<String>,

    /// Fields parsed as numbers.
    #[serde(default)]
    pub numeric: Vec<String>,
}

/// Debug/logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log level used when `QUARRY_LOG_LEVEL` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Database overrides.
    pub database: Option<DatabaseOverride>,

    /// Schema overrides.
    pub schema: Option<SchemaOverride>,

    /// Filter overrides.
    pub filter: Option<FilterOverride>,

    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Database configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseOverride {
    /// Override provider.
    pub provider: Option<DatabaseProvider>,
}

/// Schema configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaOverride {
    /// Override path.
    pub path: Option<String>,

    /// Override extensions.
    pub extensions: Option<Vec<String>>,
}

/// Filter configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOverride {
    /// Override strict.
    pub strict: Option<bool>,

    /// Override ignore_keys.
    pub ignore_keys: Option<Vec<String>>,
}

/// Debug configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Override log_level.
    pub log_level: Option<String>,
}

/// Expand environment variables in the format `${VAR_NAME}`.
///
/// Unset variables are left as written.
fn expand_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &regex_lite::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
