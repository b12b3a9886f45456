//! Locating and loading `quarry.toml` for CLI commands.

use std::path::{Path, PathBuf};

use quarry_schema::QuarryConfig;

use crate::cli::ConfigArgs;
use crate::error::{CliError, CliResult};

/// Load the config named on the command line, or `./quarry.toml` if it
/// exists, or defaults. The environment override table is applied last.
pub fn load_config(args: &ConfigArgs) -> CliResult<QuarryConfig> {
    let config = match &args.config {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            QuarryConfig::from_file(path)?
        }
        None => QuarryConfig::discover(std::env::current_dir()?)?,
    };

    Ok(match &args.env {
        Some(env) => {
            tracing::debug!(env = %env, "applying environment overrides");
            config.with_environment(env)
        }
        None => config,
    })
}

/// The schema path from the command line, or the configured one resolved
/// against the config file's directory.
pub fn resolve_schema_path(arg: Option<&Path>, args: &ConfigArgs, config: &QuarryConfig) -> PathBuf {
    if let Some(path) = arg {
        return path.to_path_buf();
    }

    let configured = PathBuf::from(&config.schema.path);
    if configured.is_absolute() {
        return configured;
    }

    match args
        .config
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        Some(base) => base.join(configured),
        None => configured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_schema::config::CONFIG_FILE_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_and_environment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[schema]
path = "schemas"

[environments.test.database]
provider = "sqlite"
"#,
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(path.clone()),
            env: Some("test".into()),
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.database.provider, quarry_schema::DatabaseProvider::Sqlite);
        assert_eq!(resolve_schema_path(None, &args, &config), dir.path().join("schemas"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/definitely/not/here/quarry.toml")),
            env: None,
        };
        assert!(matches!(load_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_schema_argument_wins() {
        let args = ConfigArgs::default();
        let config = QuarryConfig::default();
        assert_eq!(
            resolve_schema_path(Some(Path::new("x.prisma")), &args, &config),
            PathBuf::from("x.prisma")
        );
        assert_eq!(resolve_schema_path(None, &args, &config), PathBuf::from("./prisma"));
    }
}
