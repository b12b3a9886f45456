//! Integration tests for the Quarry CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
enum Role {
    USER
    ADMIN
}

model User {
    id    Int     @id @default(autoincrement())
    email String  @unique
    age   Int?
    role  Role    @default(USER)
    posts Post[]
}

model Post {
    id        Int      @id
    createdAt DateTime @default(now())
    author    User     @relation(fields: [authorId], references: [id])
    authorId  Int

    @@map("posts")
}
"#;

/// Get the quarry binary
#[allow(deprecated)]
fn quarry_cmd() -> Command {
    Command::cargo_bin("quarry").unwrap()
}

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let prisma = temp_dir.path().join("prisma");
    fs::create_dir_all(prisma.join("migrations")).unwrap();
    fs::write(prisma.join("schema.prisma"), SCHEMA).unwrap();
    fs::write(
        prisma.join("migrations").join("old.prisma"),
        "model Ghost { id Int @id }",
    )
    .unwrap();
    temp_dir
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_help_command() {
    quarry_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quarry CLI"))
        .stdout(predicate::str::contains("Usage: quarry"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("filter"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version_command() {
    quarry_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains("0.2.0"))
        .stdout(predicate::str::contains("icontains"));
}

#[test]
fn test_filter_help() {
    quarry_cmd()
        .args(["filter", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile query parameters"))
        .stdout(predicate::str::contains("--params"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_schema_summary() {
    let dir = project();

    quarry_cmd()
        .current_dir(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("User (5 fields, 1 relations)"))
        .stdout(predicate::str::contains("Post (4 fields, 1 relations) → posts"))
        .stdout(predicate::str::contains("Role: USER, ADMIN"))
        .stdout(predicate::str::contains("Ghost").not());
}

#[test]
fn test_schema_json() {
    let dir = project();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["schema", "--json", "--schema", "prisma/schema.prisma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"modelCount\": 2"))
        .stdout(predicate::str::contains("\"connectionField\": \"authorId\""))
        .stdout(predicate::str::contains("\"mapName\": \"posts\""));
}

#[test]
fn test_schema_not_found() {
    let dir = TempDir::new().unwrap();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["schema", "--schema", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema not found"));
}

#[test]
fn test_filter_query_string() {
    let dir = TempDir::new().unwrap();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "age__gt=25&name__icontains=jo&tags__in=a,b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gt\": \"25\""))
        .stdout(predicate::str::contains("\"mode\": \"insensitive\""))
        .stdout(predicate::str::contains("\"in\": ["));
}

#[test]
fn test_filter_with_model_classification() {
    let dir = project();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "age__gt=25&id__or=1,2", "--model", "User"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gt\": 25"))
        .stdout(predicate::str::contains("\"OR\""))
        .stdout(predicate::str::contains("\"id\": 2"));
}

#[test]
fn test_filter_unknown_model() {
    let dir = project();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "a=1", "--model", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model 'Nope' not found"))
        .stderr(predicate::str::contains("User, Post"));
}

#[test]
fn test_filter_uses_config() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "quarry.toml",
        r#"
[database]
provider = "sqlite"

[filter]
ignore_keys = ["page"]

[filter.fields]
numeric = ["age"]
"#,
    );

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "page=2&age__lte=40&name__icontains=jo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lte\": 40"))
        .stdout(predicate::str::contains("page").not())
        .stdout(predicate::str::contains("mode").not());
}

#[test]
fn test_filter_environment_override() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "quarry.toml",
        "[environments.local.database]\nprovider = \"mysql\"\n",
    );

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "name__contains=x", "--env", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode").not());
}

#[test]
fn test_filter_params_files_merge() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "base.json", r#"{"status": "draft", "author": {"name__startsWith": "A"}}"#);
    write(dir.path(), "override.json", r#"{"status": "published"}"#);

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "--params", "base.json", "--params", "override.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"published\""))
        .stdout(predicate::str::contains("\"startsWith\": \"A\""))
        .stdout(predicate::str::contains("draft").not());
}

#[test]
fn test_filter_strict_rejects_empty_path() {
    let dir = TempDir::new().unwrap();

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "__gt=1", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Q1003"));

    quarry_cmd()
        .current_dir(dir.path())
        .args(["filter", "__gt=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{}"));
}

#[test]
fn test_filter_requires_input() {
    quarry_cmd()
        .arg("filter")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to compile"));
}

#[test]
fn test_filter_unknown_provider() {
    quarry_cmd()
        .args(["filter", "a=1", "--provider", "oracle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown database provider"));
}
