//! Compiled filter trees.
//!
//! A [`FilterNode`] is the output of compiling query parameters. Branches are
//! keyed by field name, leaves are either a bare value (implicit equality) or
//! a set of operator conditions, and a reserved `OR` key holds alternative
//! subtrees. Serializing a node produces the JSON shape expected by query
//! builders:
//!
//! ```rust
//! use quarry_query::filter::{Condition, CompareOp, FilterNode, FilterValue};
//!
//! let node = FilterNode::wrap(
//!     ["author", "age"],
//!     FilterNode::condition(Condition::compare(CompareOp::Gt, FilterValue::Int(30))),
//! );
//! assert_eq!(node.to_json().to_string(), r#"{"author":{"age":{"gt":30}}}"#);
//! ```

mod builder;
mod merge;

pub use builder::FilterBuilder;
pub(crate) use builder::ORDER_BY_KEY;
pub use merge::{DeepMerge, is_unsafe_key};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use smol_str::SmolStr;

use crate::operator::FilterOperator;

/// Reserved key holding disjunction alternatives.
pub const OR_KEY: &str = "OR";

/// A filter value that can be used in comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Timestamp, serialized as RFC 3339.
    DateTime(DateTime<Utc>),
    /// List of values.
    List(Vec<FilterValue>),
    /// Any other JSON value, passed through untouched.
    Json(serde_json::Value),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Json(Value::Number(n)), Self::Float),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            obj @ Value::Object(_) => Self::Json(obj),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

/// Operators compiled to `{op: value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `equals`
    Equals,
    /// `gt`
    Gt,
    /// `gte`
    Gte,
    /// `lt`
    Lt,
    /// `lte`
    Lte,
    /// `startsWith`
    StartsWith,
    /// `endsWith`
    EndsWith,
    /// `not`
    Not,
    /// `some`
    Some,
    /// `none`
    None,
    /// `every`
    Every,
}

impl CompareOp {
    /// Map a filter operator onto a comparison, if it is one.
    pub fn from_operator(op: FilterOperator) -> Option<Self> {
        Some(match op {
            FilterOperator::Equals => Self::Equals,
            FilterOperator::Gt => Self::Gt,
            FilterOperator::Gte => Self::Gte,
            FilterOperator::Lt => Self::Lt,
            FilterOperator::Lte => Self::Lte,
            FilterOperator::StartsWith => Self::StartsWith,
            FilterOperator::EndsWith => Self::EndsWith,
            FilterOperator::Not => Self::Not,
            FilterOperator::Some => Self::Some,
            FilterOperator::None => Self::None,
            FilterOperator::Every => Self::Every,
            _ => return Option::None,
        })
    }

    /// Key used in the compiled tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Not => "not",
            Self::Some => "some",
            Self::None => "none",
            Self::Every => "every",
        }
    }
}

/// Operators compiled to `{op: [values]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipOp {
    /// `in`
    In,
    /// `notIn`
    NotIn,
    /// `hasSome`
    HasSome,
    /// `hasEvery`
    HasEvery,
}

impl MembershipOp {
    /// Map a filter operator onto a membership test, if it is one.
    pub fn from_operator(op: FilterOperator) -> Option<Self> {
        match op {
            FilterOperator::In => Some(Self::In),
            FilterOperator::NotIn => Some(Self::NotIn),
            FilterOperator::HasSome => Some(Self::HasSome),
            FilterOperator::HasEvery => Some(Self::HasEvery),
            _ => None,
        }
    }

    /// Key used in the compiled tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::HasSome => "hasSome",
            Self::HasEvery => "hasEvery",
        }
    }
}

/// Case sensitivity of a `contains` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Case-sensitive match.
    Sensitive,
    /// Case-insensitive match.
    Insensitive,
}

impl QueryMode {
    /// Mode name in the compiled tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensitive => "sensitive",
            Self::Insensitive => "insensitive",
        }
    }
}

/// One operator applied to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `{op: value}`
    Compare {
        /// Comparison operator.
        op: CompareOp,
        /// Coerced operand.
        value: FilterValue,
    },
    /// `{contains: value, mode: ...}`
    Contains {
        /// Substring.
        value: String,
        /// Case mode; absent when the backend has no case modes.
        mode: Option<QueryMode>,
    },
    /// `{op: [values]}`
    Membership {
        /// Membership operator.
        op: MembershipOp,
        /// Coerced list elements.
        values: Vec<FilterValue>,
    },
    /// An `isNull`/`isEmpty` test that was not switched on. Filters nothing.
    Unset,
}

impl Condition {
    /// Build a comparison.
    pub fn compare(op: CompareOp, value: impl Into<FilterValue>) -> Self {
        Self::Compare {
            op,
            value: value.into(),
        }
    }

    /// Build a substring match.
    pub fn contains(value: impl Into<String>, mode: Option<QueryMode>) -> Self {
        Self::Contains {
            value: value.into(),
            mode,
        }
    }

    /// Build a membership test.
    pub fn membership(op: MembershipOp, values: Vec<FilterValue>) -> Self {
        Self::Membership { op, values }
    }

    /// Key this condition occupies in its operator object.
    ///
    /// Two conditions with the same key cannot both be present. Merging
    /// concatenates their list operands, otherwise the later one wins.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Compare { op, .. } => op.as_str(),
            Self::Contains { .. } => "contains",
            Self::Membership { op, .. } => op.as_str(),
            Self::Unset => "equals",
        }
    }
}

/// A compiled filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// A bare leaf value: implicit equality.
    Equals(FilterValue),
    /// Operator conditions on one field.
    Conditions(Vec<Condition>),
    /// Alternatives, held under the `OR` key.
    Or(Vec<FilterNode>),
    /// Field-keyed branches.
    Nested(IndexMap<SmolStr, FilterNode>),
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::empty()
    }
}

impl FilterNode {
    /// An empty branch: the identity for merging.
    pub fn empty() -> Self {
        Self::Nested(IndexMap::new())
    }

    /// A leaf with a single condition.
    pub fn condition(condition: Condition) -> Self {
        Self::Conditions(vec![condition])
    }

    /// Wrap `leaf` in one branch per field, outermost first.
    pub fn wrap<I, S>(fields: I, leaf: FilterNode) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: AsRef<str>,
    {
        fields.into_iter().rev().fold(leaf, |inner, field| {
            let mut map = IndexMap::with_capacity(1);
            map.insert(SmolStr::new(field.as_ref()), inner);
            Self::Nested(map)
        })
    }

    /// Check whether this is a branch with no children.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Nested(map) if map.is_empty())
    }

    /// Get a child branch by key.
    pub fn get(&self, key: &str) -> Option<&FilterNode> {
        match self {
            Self::Nested(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a path of keys.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&FilterNode> {
        path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Top-level keys of a branch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let map = match self {
            Self::Nested(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(|m| m.keys().map(SmolStr::as_str))
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Equals(value) => value.serialize(serializer),
            Self::Conditions(conditions) => {
                let mut map = serializer.serialize_map(None)?;
                for condition in conditions {
                    match condition {
                        Condition::Compare { op, value } => map.serialize_entry(op.as_str(), value)?,
                        Condition::Contains { value, mode } => {
                            map.serialize_entry("contains", value)?;
                            if let Some(mode) = mode {
                                map.serialize_entry("mode", mode.as_str())?;
                            }
                        }
                        Condition::Membership { op, values } => {
                            map.serialize_entry(op.as_str(), values)?
                        }
                        Condition::Unset => {}
                    }
                }
                map.end()
            }
            Self::Or(alternatives) => {
                let mut seq = serializer.serialize_seq(Some(alternatives.len()))?;
                for alternative in alternatives {
                    seq.serialize_element(alternative)?;
                }
                seq.end()
            }
            Self::Nested(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(key.as_str(), child)?;
                }
                map.end()
            }
        }
    }
}
