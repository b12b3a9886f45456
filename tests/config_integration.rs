//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `quarry.toml` drives schema loading and filter
//! compilation the same way explicit builder calls do.

use pretty_assertions::assert_eq;
use quarry::prelude::*;
use quarry::schema::SchemaError;
use quarry::schema::config::CONFIG_FILE_NAME;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Test that an empty file yields the defaults
#[test]
fn test_config_defaults() {
    let config = QuarryConfig::from_str("").expect("Failed to parse config");

    assert_eq!(config.database.provider, DatabaseProvider::PostgreSql);
    assert_eq!(config.schema.path, "./prisma");
    assert_eq!(config.schema.extensions, vec!["prisma"]);
    assert!(!config.filter.strict);
    assert!(config.filter.ignore_keys.is_empty());
    assert_eq!(config.debug.log_level, "warn");
}

/// Test full configuration with all sections
#[test]
fn test_config_full() {
    let config = QuarryConfig::from_str(
        r#"
        [database]
        provider = "mysql"

        [schema]
        path = "db/schema"
        extensions = ["prisma", "schema"]

        [filter]
        strict = true
        ignore_keys = ["page", "limit"]

        [filter.fields]
        date = ["createdAt"]
        boolean = ["published"]
        numeric = ["views"]

        [debug]
        log_level = "debug"
        "#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.database.provider, DatabaseProvider::MySql);
    assert_eq!(config.schema.path, "db/schema");
    assert_eq!(config.schema.extensions, vec!["prisma", "schema"]);
    assert!(config.filter.strict);
    assert_eq!(config.filter.ignore_keys, vec!["page", "limit"]);
    assert_eq!(config.filter.fields.date, vec!["createdAt"]);
    assert_eq!(config.debug.log_level, "debug");
}

/// Test that typos in keys are reported instead of ignored
#[test]
fn test_config_rejects_unknown_keys() {
    let err = QuarryConfig::from_str("[filter]\nstrikt = true").unwrap_err();
    assert!(matches!(err, SchemaError::TomlError { .. }));
}

/// Test environment variable interpolation
#[test]
fn test_config_env_vars() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("QUARRY_IT_SCHEMA_PATH", "/srv/app/schema.prisma");
    }

    let config = QuarryConfig::from_str(
        r#"
        [schema]
        path = "${QUARRY_IT_SCHEMA_PATH}"

        [debug]
        log_level = "${QUARRY_IT_UNSET_LEVEL}"
        "#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.schema.path, "/srv/app/schema.prisma");
    assert_eq!(config.debug.log_level, "${QUARRY_IT_UNSET_LEVEL}");

    unsafe {
        std::env::remove_var("QUARRY_IT_SCHEMA_PATH");
    }
}

/// Test environment overrides layered on the base config
#[test]
fn test_config_environments() {
    let toml = r#"
        [database]
        provider = "postgresql"

        [filter]
        ignore_keys = ["page"]

        [environments.ci.database]
        provider = "sqlite"

        [environments.ci.filter]
        ignore_keys = ["page", "seed"]

        [environments.ci.schema]
        path = "fixtures/schema.prisma"
    "#;

    let base = QuarryConfig::from_str(toml).unwrap();
    assert_eq!(base.environments.len(), 1);

    let ci = base.clone().with_environment("ci");
    assert_eq!(ci.database.provider, DatabaseProvider::Sqlite);
    assert_eq!(ci.filter.ignore_keys, vec!["page", "seed"]);
    assert_eq!(ci.schema.path, "fixtures/schema.prisma");
    assert_eq!(ci.schema.extensions, vec!["prisma"]);

    let unknown = base.with_environment("staging");
    assert_eq!(unknown.database.provider, DatabaseProvider::PostgreSql);
}

/// Test that the compiler picks up provider, keys and field lists
#[test]
fn test_config_drives_compiler() {
    let config = QuarryConfig::from_str(
        r#"
        [database]
        provider = "mongo"

        [filter]
        strict = true
        ignore_keys = ["cursor"]

        [filter.fields]
        date = ["createdAt"]
        boolean = ["published"]
        "#,
    )
    .unwrap();

    let compiler = FilterCompiler::from_config(&config);
    assert_eq!(compiler.provider(), DatabaseProvider::MongoDb);
    assert!(compiler.is_strict());

    let tree = compiler
        .try_compile_query_string(
            "cursor=abc&published=yes&createdAt__gte=2024-03-01T12:00:00Z&title__icontains=rust",
        )
        .unwrap();
    assert_eq!(
        tree.to_json(),
        json!({
            "published": false,
            "createdAt": {"gte": "2024-03-01T12:00:00Z"},
            "title": {"contains": "rust", "mode": "insensitive"}
        })
    );

    assert!(compiler.try_compile_query_string("__lt=3").is_err());
}

/// Test loading a project laid out on disk
#[test]
fn test_discovered_project() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[schema]\npath = \"models\"\nextensions = [\"schema\"]\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("models")).unwrap();
    fs::write(
        dir.path().join("models").join("order.schema"),
        "model Order { id Int @id total Decimal paid Boolean }",
    )
    .unwrap();
    fs::write(
        dir.path().join("models").join("draft.prisma"),
        "model Draft { id Int @id }",
    )
    .unwrap();

    let config = QuarryConfig::discover(dir.path()).unwrap();
    let registry = SchemaRegistry::new();
    let doc = registry
        .load_path_with(dir.path().join(&config.schema.path), config.schema.extensions.as_slice())
        .unwrap();

    assert_eq!(doc.model_names().collect::<Vec<_>>(), vec!["Order"]);

    let order = doc.get_model("Order").unwrap();
    let compiler = FilterCompiler::from_config(&config)
        .with_classification(FieldClassification::from_model(order));
    assert_eq!(
        compiler.compile_query_string("total__gt=9.99&paid=True").to_json(),
        json!({"total": {"gt": 9.99}, "paid": true})
    );
}
