//! `quarry filter` command - Compile query parameters into a filter tree.

use serde_json::Value;

use quarry_query::params::params_from_json;
use quarry_query::{DeepMerge, FieldClassification, FilterCompiler, parse_query_string};
use quarry_schema::SchemaRegistry;

use crate::cli::FilterArgs;
use crate::config::{load_config, resolve_schema_path};
use crate::error::{CliError, CliResult};
use crate::output;

/// Run the filter command
pub async fn run(args: FilterArgs) -> CliResult<()> {
    let config = load_config(&args.config)?;

    let mut compiler = FilterCompiler::from_config(&config);
    if let Some(provider) = &args.provider {
        compiler = compiler.with_provider_name(provider)?;
    }
    if args.strict {
        compiler = compiler.strict(true);
    }

    if let Some(model_name) = &args.model {
        let schema_path = resolve_schema_path(args.schema.as_deref(), &args.config, &config);
        let registry = SchemaRegistry::new();
        let doc = registry.load_path_with(&schema_path, config.schema.extensions.as_slice())?;

        let model = doc.get_model(model_name).ok_or_else(|| {
            let known = doc.model_names().collect::<Vec<_>>().join(", ");
            CliError::Command(format!(
                "Model '{}' not found in {} (known models: {})",
                model_name,
                schema_path.display(),
                if known.is_empty() { "none" } else { known.as_str() }
            ))
        })?;
        compiler = compiler.extend_classification(&FieldClassification::from_model(model));
    }

    let params = collect_params(&args).await?;
    quarry_query::quarry_debug!(
        keys = params.len(),
        provider = compiler.provider().as_str(),
        strict = compiler.is_strict(),
        "compiling parameters"
    );
    let tree = compiler.try_compile(&params)?;

    output::json(&serde_json::to_string_pretty(&tree)?);
    Ok(())
}

/// Merge parameter files in order, then the query string on top.
async fn collect_params(args: &FilterArgs) -> CliResult<quarry_query::QueryParams> {
    if args.params.is_empty() && args.query.is_none() {
        return Err(CliError::Command(
            "Nothing to compile: pass a query string or --params FILE".to_string(),
        ));
    }

    let mut merged = Value::Object(Default::default());
    for path in &args.params {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CliError::Command(format!("Failed to read {}: {}", path.display(), e))
        })?;
        merged.merge_from(Value::Object(params_from_json(&content)?));
    }
    if let Some(query) = &args.query {
        merged.merge_from(Value::Object(parse_query_string(query)));
    }

    match merged {
        Value::Object(map) => Ok(map),
        _ => Ok(Default::default()),
    }
}
