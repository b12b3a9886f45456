//! Structural Merge.
//!
//! Combines two trees of the same shape family:
//! - both lists: target elements, then source elements
//! - both mergeable objects: key-wise, recursing where both sides hold a
//!   mergeable value at the same key
//! - anything else: the source replaces the target
//!
//! Merging is not commutative when keys collide; the source wins. Keys that
//! could reach a prototype chain in downstream JavaScript consumers
//! (`__proto__`, `constructor`, `prototype`) are never carried forward.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{Condition, FilterNode, FilterValue};

const UNSAFE_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Check whether a key is dropped by merging.
pub fn is_unsafe_key(key: &str) -> bool {
    UNSAFE_KEYS.contains(&key)
}

/// Deep, source-wins merging.
pub trait DeepMerge: Sized {
    /// Merge `source` into `self`.
    fn merge_from(&mut self, source: Self);

    /// Merge `source` into `self` and return the result.
    fn merge(mut self, source: Self) -> Self {
        self.merge_from(source);
        self
    }
}

impl DeepMerge for FilterNode {
    fn merge_from(&mut self, source: Self) {
        match (self, source) {
            (FilterNode::Nested(target), FilterNode::Nested(source)) => {
                merge_maps(target, source, |t, s| t.merge_from(s))
            }
            (FilterNode::Or(target), FilterNode::Or(source)) => target.extend(source),
            (
                FilterNode::Equals(FilterValue::List(target)),
                FilterNode::Equals(FilterValue::List(source)),
            ) => target.extend(source),
            (FilterNode::Conditions(target), FilterNode::Conditions(source)) => {
                for condition in source {
                    merge_condition(target, condition);
                }
            }
            (target, source) => *target = sanitize_node(source),
        }
    }
}

impl DeepMerge for serde_json::Value {
    fn merge_from(&mut self, source: Self) {
        use serde_json::Value;

        match (self, source) {
            (Value::Object(target), Value::Object(source)) => {
                target.retain(|k, _| !is_unsafe_key(k));
                for (key, value) in source {
                    if is_unsafe_key(&key) {
                        continue;
                    }
                    match target.get_mut(&key) {
                        Some(existing) => existing.merge_from(value),
                        None => {
                            target.insert(key, sanitize_json(value));
                        }
                    }
                }
            }
            (Value::Array(target), Value::Array(source)) => {
                target.extend(source.into_iter().map(sanitize_json))
            }
            (target, source) => *target = sanitize_json(source),
        }
    }
}

fn merge_maps(
    target: &mut IndexMap<SmolStr, FilterNode>,
    source: IndexMap<SmolStr, FilterNode>,
    merge: impl Fn(&mut FilterNode, FilterNode),
) {
    target.retain(|k, _| !is_unsafe_key(k));
    for (key, value) in source {
        if is_unsafe_key(&key) {
            continue;
        }
        match target.get_mut(&key) {
            Some(existing) => merge(existing, value),
            None => {
                target.insert(key, sanitize_node(value));
            }
        }
    }
}

/// Concatenate list operands under the same key, replace anything else, or
/// append when the key is new.
fn merge_condition(target: &mut Vec<Condition>, condition: Condition) {
    let Some(existing) = target.iter_mut().find(|c| c.key() == condition.key()) else {
        target.push(condition);
        return;
    };

    match (existing, condition) {
        (Condition::Membership { values, .. }, Condition::Membership { values: more, .. }) => {
            values.extend(more)
        }
        (
            Condition::Compare { value: FilterValue::List(values), .. },
            Condition::Compare { value: FilterValue::List(more), .. },
        ) => values.extend(more),
        (existing, condition) => *existing = condition,
    }
}

/// Drop unsafe keys from a subtree carried over whole.
fn sanitize_node(node: FilterNode) -> FilterNode {
    match node {
        FilterNode::Nested(map) => FilterNode::Nested(
            map.into_iter()
                .filter(|(k, _)| !is_unsafe_key(k))
                .map(|(k, v)| (k, sanitize_node(v)))
                .collect(),
        ),
        FilterNode::Or(alternatives) => {
            FilterNode::Or(alternatives.into_iter().map(sanitize_node).collect())
        }
        other => other,
    }
}

fn sanitize_json(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| !is_unsafe_key(k))
                .map(|(k, v)| (k, sanitize_json(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_json).collect()),
        other => other,
    }
}
