//! Nested-Value Traverser.
//!
//! Flattens a parameter whose value is itself a filter object into
//! `(fields, operator, value)` triples, in input key order.

use serde_json::Value;
use smol_str::SmolStr;
use tracing::trace;

use crate::key::{needs_tokenizing, pop_operator, split_segments};
use crate::operator::FilterOperator;

/// One flattened filter: a field path, an optional operator and a raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTriple {
    /// Path segments, outermost first.
    pub fields: Vec<SmolStr>,
    /// Trailing operator.
    pub operator: Option<FilterOperator>,
    /// Raw, uncoerced value.
    pub value: Value,
}

impl FilterTriple {
    /// Create a triple.
    pub fn new(fields: Vec<SmolStr>, operator: Option<FilterOperator>, value: Value) -> Self {
        Self {
            fields,
            operator,
            value,
        }
    }

    /// Check whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The path and operator re-encoded as a flat key.
    pub fn key(&self) -> String {
        crate::key::FilterKey::new(self.fields.clone(), self.operator).to_key()
    }
}

/// Flatten one top-level parameter.
///
/// Non-array objects are descended into; every other value, arrays
/// included, is a leaf. Keys containing `__` or `[` are tokenized, other
/// keys are taken as one literal segment. Only the last segment of a
/// complete path is checked against the operator vocabulary.
pub fn traverse(key: &str, value: &Value) -> Vec<FilterTriple> {
    let mut triples = Vec::new();
    walk(segments_of(key), value, &mut triples);
    triples
}

fn walk(path: Vec<SmolStr>, value: &Value, out: &mut Vec<FilterTriple>) {
    match value {
        Value::Object(map) if map.is_empty() => {
            trace!(path = ?path, "empty object, nothing to emit");
        }
        Value::Object(map) => {
            for (key, child) in map {
                let mut child_path = path.clone();
                child_path.extend(segments_of(key));
                walk(child_path, child, out);
            }
        }
        leaf => {
            let mut fields = path;
            let operator = pop_operator(&mut fields);
            out.push(FilterTriple::new(fields, operator, leaf.clone()));
        }
    }
}

fn segments_of(key: &str) -> Vec<SmolStr> {
    if needs_tokenizing(key) {
        split_segments(key)
    } else {
        vec![SmolStr::new(key)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paths(triples: &[FilterTriple]) -> Vec<String> {
        triples.iter().map(FilterTriple::key).collect()
    }

    #[test]
    fn test_flat_key_and_scalar() {
        let triples = traverse("age__gte", &json!("18"));
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].fields, vec![SmolStr::new("age")]);
        assert_eq!(triples[0].operator, Some(FilterOperator::Gte));
        assert_eq!(triples[0].value, json!("18"));
    }

    #[test]
    fn test_nested_object() {
        let value = json!({
            "name__icontains": "jo",
            "profile": {"city": "Oslo", "age": {"gt": 30}}
        });
        let triples = traverse("author", &value);

        assert_eq!(
            paths(&triples),
            vec!["author__name__icontains", "author__profile__city", "author__profile__age__gt"]
        );
        assert_eq!(triples[2].value, json!(30));
    }

    #[test]
    fn test_operator_only_checked_at_the_end() {
        let triples = traverse("posts", &json!({"some": {"title": "x"}}));
        assert_eq!(triples[0].fields, vec![SmolStr::new("posts"), "some".into(), "title".into()]);
        assert_eq!(triples[0].operator, None);
    }

    #[test]
    fn test_arrays_are_leaves() {
        let triples = traverse("tags", &json!({"in": ["a", {"b": 1}]}));
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].operator, Some(FilterOperator::In));
        assert_eq!(triples[0].value, json!(["a", {"b": 1}]));
    }

    #[test]
    fn test_bracket_keys_inside_objects() {
        let triples = traverse("filter", &json!({"author[name]": "x"}));
        assert_eq!(paths(&triples), vec!["filter__author__name"]);
    }

    #[test]
    fn test_empty_object_emits_nothing() {
        assert!(traverse("author", &json!({})).is_empty());
        assert!(traverse("author", &json!({"profile": {}})).is_empty());
    }

    #[test]
    fn test_literal_keys_keep_single_underscores() {
        let triples = traverse("created_at", &json!("2024-01-01"));
        assert_eq!(triples[0].fields, vec![SmolStr::new("created_at")]);
    }

    #[test]
    fn test_empty_key_yields_empty_path() {
        let triples = traverse("__", &json!("x"));
        assert_eq!(triples.len(), 1);
        assert!(triples[0].is_empty());
    }
}
