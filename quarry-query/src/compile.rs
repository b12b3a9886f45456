//! Compiling parameter maps into one filter tree.
//!
//! Every parameter is flattened into triples, each triple is built into a
//! subtree, and the subtrees are merged in input order so later keys
//! override earlier ones on conflict.
//!
//! ```rust
//! use quarry_query::{FieldClassification, FilterCompiler};
//!
//! let compiler = FilterCompiler::new()
//!     .with_classification(FieldClassification::builder().numerics(["age"]).build());
//!
//! let tree = compiler.compile_query_string("age__gt=25&name__icontains=jo");
//! assert_eq!(
//!     tree.to_json(),
//!     serde_json::json!({
//!         "age": {"gt": 25},
//!         "name": {"contains": "jo", "mode": "insensitive"}
//!     })
//! );
//! ```

use tracing::{debug, trace, warn};

use quarry_schema::{DatabaseProvider, QuarryConfig};

use crate::coerce::FieldClassification;
use crate::error::{QueryError, QueryResult};
use crate::filter::{DeepMerge, FilterBuilder, FilterNode, ORDER_BY_KEY};
use crate::params::{QueryParams, params_from_json, parse_query_string};
use crate::traverse::{FilterTriple, traverse};

/// Compiles query parameters into a [`FilterNode`].
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    classification: FieldClassification,
    provider: DatabaseProvider,
    strict: bool,
    ignore_keys: Vec<String>,
}

/// Output of a compilation pass before strictness is applied.
struct Compiled {
    tree: FilterNode,
    rejected: Vec<QueryError>,
}

impl FilterCompiler {
    /// Create a lenient compiler for the default provider with no field
    /// classification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a compiler from the `[database]` and `[filter]` config tables.
    pub fn from_config(config: &QuarryConfig) -> Self {
        Self {
            classification: FieldClassification::from_config(&config.filter.fields),
            provider: config.database.provider,
            strict: config.filter.strict,
            ignore_keys: config.filter.ignore_keys.clone(),
        }
    }

    /// Set the field classification table.
    pub fn with_classification(mut self, classification: FieldClassification) -> Self {
        self.classification = classification;
        self
    }

    /// Merge more names into the field classification table.
    pub fn extend_classification(mut self, classification: &FieldClassification) -> Self {
        self.classification = self.classification.merge(classification);
        self
    }

    /// Set the target backend.
    pub fn with_provider(mut self, provider: DatabaseProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the target backend by name.
    pub fn with_provider_name(self, name: &str) -> QueryResult<Self> {
        let provider = DatabaseProvider::from_str(name).ok_or_else(|| {
            QueryError::invalid_configuration(format!("Unknown database provider '{}'", name))
                .with_help(format!(
                    "Expected one of: {}",
                    DatabaseProvider::all()
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
        })?;
        Ok(self.with_provider(provider))
    }

    /// Reject keys with an empty field path in [`FilterCompiler::try_compile`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Skip parameters with these exact keys (pagination and the like).
    pub fn ignore_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// The classification table in use.
    pub fn classification(&self) -> &FieldClassification {
        &self.classification
    }

    /// The target backend.
    pub fn provider(&self) -> DatabaseProvider {
        self.provider
    }

    /// Whether strict mode is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Compile leniently: keys with an empty field path are dropped with a
    /// warning.
    pub fn compile(&self, params: &QueryParams) -> FilterNode {
        self.compile_inner(params).tree
    }

    /// Compile, failing on the first rejected key when the compiler is
    /// strict.
    ///
    /// Strict mode rejects keys with an empty field path (Q1003) and
    /// ordering directives whose direction is not `asc` or `desc` (Q5003).
    pub fn try_compile(&self, params: &QueryParams) -> QueryResult<FilterNode> {
        let compiled = self.compile_inner(params);
        if self.strict {
            if let Some(err) = compiled.rejected.into_iter().next() {
                return Err(err);
            }
        }
        Ok(compiled.tree)
    }

    /// Decode a urlencoded query string and compile it leniently.
    pub fn compile_query_string(&self, query: &str) -> FilterNode {
        self.compile(&parse_query_string(query))
    }

    /// Decode a urlencoded query string and compile it.
    pub fn try_compile_query_string(&self, query: &str) -> QueryResult<FilterNode> {
        self.try_compile(&parse_query_string(query))
    }

    /// Decode a JSON parameter object and compile it.
    pub fn compile_json(&self, json: &str) -> QueryResult<FilterNode> {
        self.try_compile(&params_from_json(json)?)
    }

    fn compile_inner(&self, params: &QueryParams) -> Compiled {
        let builder = FilterBuilder::new(&self.classification, self.provider);
        let mut tree = FilterNode::empty();
        let mut rejected = Vec::new();

        for (key, value) in params {
            if self.ignore_keys.iter().any(|k| k == key) {
                trace!(key = %key, "ignoring parameter");
                continue;
            }

            for triple in traverse(key, value) {
                crate::quarry_trace!(key = %key, triple = %triple.key(), "building subtree");
                if !has_sort_direction(&triple) {
                    debug!(key = %key, value = %triple.value, "unrecognized sort direction");
                    rejected.push(QueryError::invalid_parameter(
                        key.as_str(),
                        "sort direction must be `asc` or `desc`",
                    ));
                }
                match builder.build(&triple) {
                    Some(subtree) => tree.merge_from(subtree),
                    None => {
                        warn!(key = %key, "dropping filter key with an empty field path");
                        rejected.push(QueryError::empty_path(key.as_str()));
                    }
                }
            }
        }

        debug!(
            params = params.len(),
            rejected = rejected.len(),
            "compiled filter tree"
        );
        Compiled { tree, rejected }
    }
}

/// `false` only for an `orderBy__field` directive whose value is not a
/// sort direction.
fn has_sort_direction(triple: &FilterTriple) -> bool {
    let is_ordering = triple.operator.is_none()
        && triple.fields.len() == 2
        && triple.fields[0] == ORDER_BY_KEY;
    if !is_ordering {
        return true;
    }
    triple
        .value
        .as_str()
        .is_some_and(|dir| dir.eq_ignore_ascii_case("asc") || dir.eq_ignore_ascii_case("desc"))
}
