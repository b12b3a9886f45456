//! Key Tokenizer.
//!
//! A flat parameter key encodes a field path and an optional trailing
//! operator. Segments are separated by `__` or wrapped in brackets:
//!
//! ```rust
//! use quarry_query::{FilterKey, FilterOperator};
//!
//! let key = FilterKey::parse("author__name__icontains");
//! assert_eq!(key.fields, ["author", "name"]);
//! assert_eq!(key.operator, Some(FilterOperator::Icontains));
//!
//! let key = FilterKey::parse("author[name][icontains]");
//! assert_eq!(key.fields, ["author", "name"]);
//! ```

use pest::Parser;
use pest_derive::Parser;
use smol_str::SmolStr;

use crate::operator::FilterOperator;

/// Path/operator delimiter.
pub const DELIMITER: &str = "__";

#[derive(Parser)]
#[grammar = "key.pest"]
struct KeyParser;

/// A tokenized filter key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterKey {
    /// Path segments, outermost first.
    pub fields: Vec<SmolStr>,
    /// Trailing operator, if the last segment was one.
    pub operator: Option<FilterOperator>,
}

impl FilterKey {
    /// Tokenize a key and pop a trailing operator.
    pub fn parse(key: &str) -> Self {
        let mut fields = split_segments(key);
        let operator = pop_operator(&mut fields);
        Self { fields, operator }
    }

    /// Build a key from parts.
    pub fn new(fields: Vec<SmolStr>, operator: Option<FilterOperator>) -> Self {
        Self { fields, operator }
    }

    /// Check whether the key has no field path and must be dropped.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Outermost path segment.
    pub fn root(&self) -> Option<&str> {
        self.fields.first().map(SmolStr::as_str)
    }

    /// Re-encode as a `__`-delimited key.
    pub fn to_key(&self) -> String {
        let mut parts: Vec<&str> = self.fields.iter().map(SmolStr::as_str).collect();
        if let Some(op) = self.operator {
            parts.push(op.as_str());
        }
        parts.join(DELIMITER)
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_key())
    }
}

/// Check whether a key uses the delimiter or bracket encoding.
pub fn needs_tokenizing(key: &str) -> bool {
    key.contains(DELIMITER) || key.contains('[')
}

/// Split a key into path segments without looking at operators.
///
/// Empty segments (from `____` or `[]`) are dropped.
pub fn split_segments(key: &str) -> Vec<SmolStr> {
    let Ok(mut pairs) = KeyParser::parse(Rule::filter_key, key) else {
        return vec![SmolStr::new(key)];
    };
    let Some(root) = pairs.next() else {
        return vec![];
    };

    let mut segments = Vec::new();
    for pair in root.into_inner() {
        let text = match pair.as_rule() {
            Rule::segment => pair.as_str(),
            Rule::bracketed => pair.into_inner().next().map_or("", |inner| inner.as_str()),
            _ => continue,
        };
        if !text.is_empty() {
            segments.push(SmolStr::new(text));
        }
    }
    segments
}

/// Pop the last segment if it is an operator.
///
/// An operator with no field in front of it is discarded, leaving an empty
/// path with no operator.
pub fn pop_operator(fields: &mut Vec<SmolStr>) -> Option<FilterOperator> {
    let op = fields.last().and_then(|last| FilterOperator::from_str(last))?;
    fields.pop();
    (!fields.is_empty()).then_some(op)
}
