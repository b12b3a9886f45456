//! `quarry schema` command - Parse schema files and summarize them.

use serde::Serialize;

use quarry_schema::{SchemaDocument, SchemaRegistry};

use crate::cli::SchemaArgs;
use crate::config::{load_config, resolve_schema_path};
use crate::error::CliResult;
use crate::output::{self, kv, list_item};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaReport<'a> {
    source: String,
    model_count: usize,
    enum_count: usize,
    field_count: usize,
    relation_count: usize,
    document: &'a SchemaDocument,
}

/// Run the schema command
pub async fn run(args: SchemaArgs) -> CliResult<()> {
    let config = load_config(&args.config)?;
    let schema_path = resolve_schema_path(args.schema.as_deref(), &args.config, &config);

    let registry = SchemaRegistry::new();
    let doc = registry.load_path_with(&schema_path, config.schema.extensions.as_slice())?;
    let stats = doc.stats();

    if args.json {
        let report = SchemaReport {
            source: schema_path.display().to_string(),
            model_count: stats.model_count,
            enum_count: stats.enum_count,
            field_count: stats.field_count,
            relation_count: stats.relation_count,
            document: &*doc,
        };
        output::json(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header("Schema");
    kv("Source", schema_path.display());
    output::newline();

    if doc.is_empty() {
        output::warn("No models or enums found");
        return Ok(());
    }

    if !doc.models.is_empty() {
        output::section("Models");
        for model in &doc.models {
            let mut line = format!("{} ({} fields", model.name(), model.fields.len());
            let relations = model.relation_fields().count();
            if relations > 0 {
                line.push_str(&format!(", {} relations", relations));
            }
            line.push(')');
            if let Some(table) = &model.map_name {
                line.push_str(&format!(" → {}", table));
            }
            list_item(&line);
        }
        output::newline();
    }

    if !doc.enums.is_empty() {
        output::section("Enums");
        for e in &doc.enums {
            list_item(&format!("{}: {}", e.name(), e.values.join(", ")));
        }
        output::newline();
    }

    output::section("Summary");
    kv("Models", stats.model_count);
    kv("Enums", stats.enum_count);
    kv("Total Fields", stats.field_count);
    kv("Relations", stats.relation_count);
    output::newline();
    output::success("Schema parsed");

    Ok(())
}
