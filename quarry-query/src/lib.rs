//! # quarry-query
//!
//! Compiles flat HTTP query parameters into nested filter trees.
//!
//! This crate provides:
//! - A closed operator vocabulary and a key tokenizer for
//!   `field__nested__operator` and `field[nested][operator]` keys
//! - A traverser that flattens nested parameter objects into triples
//! - Value coercion driven by a date/boolean/numeric field classification
//! - A per-key filter builder and a deep, source-wins structural merge
//! - [`FilterCompiler`], which runs the whole pipeline over a parameter map
//!
//! ## Example
//!
//! ```rust
//! use quarry_query::{FieldClassification, FilterCompiler};
//!
//! let compiler = FilterCompiler::new()
//!     .with_classification(FieldClassification::builder().numerics(["id"]).build())
//!     .ignore_keys(["page"]);
//!
//! let tree = compiler.compile_query_string("page=3&id__or=1,2&tags__in=a,b&orderBy__createdAt=desc");
//! assert_eq!(
//!     tree.to_json(),
//!     serde_json::json!({
//!         "OR": [{"id": 1}, {"id": 2}],
//!         "tags": {"in": ["a", "b"]},
//!         "orderBy": {"createdAt": "desc"}
//!     })
//! );
//! ```
//!
//! Compilation is lenient: keys with an empty field path are dropped and
//! logged. A strict compiler turns them into [`QueryError`]s.

pub mod coerce;
pub mod compile;
pub mod error;
pub mod filter;
pub mod key;
pub mod logging;
pub mod operator;
pub mod params;
pub mod traverse;

pub use coerce::{FieldCategory, FieldClassification};
pub use compile::FilterCompiler;
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use filter::{
    CompareOp, Condition, DeepMerge, FilterBuilder, FilterNode, FilterValue, MembershipOp, QueryMode,
};
pub use key::FilterKey;
pub use operator::FilterOperator;
pub use params::{QueryParams, parse_query_string};
pub use traverse::{FilterTriple, traverse};

pub use logging::{
    LogFormat, get_log_format, get_log_level, init as init_logging, init_with_level, is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::coerce::FieldClassification;
    pub use crate::compile::FilterCompiler;
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::{DeepMerge, FilterNode, FilterValue};
    pub use crate::key::FilterKey;
    pub use crate::operator::FilterOperator;
    pub use crate::params::QueryParams;
}
