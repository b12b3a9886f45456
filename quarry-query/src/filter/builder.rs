//! Filter Tree Builder.
//!
//! Turns one [`FilterTriple`] into a subtree rooted at the triple's
//! outermost field. Values are coerced by the classification of the
//! outermost segment, so `author__birthDate__gt` coerces as `author`.

use serde_json::Value;
use smol_str::SmolStr;

use quarry_schema::DatabaseProvider;

use super::{CompareOp, Condition, FilterNode, FilterValue, MembershipOp, OR_KEY, QueryMode};
use crate::coerce::FieldClassification;
use crate::operator::FilterOperator;
use crate::traverse::FilterTriple;

/// Leading segment of ordering directives.
pub const ORDER_BY_KEY: &str = "orderBy";

/// Separator for list-valued parameters. There is no escape for a literal comma.
const LIST_SEPARATOR: char = ',';

/// Builds per-triple filter subtrees.
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder<'a> {
    classification: &'a FieldClassification,
    provider: DatabaseProvider,
}

impl<'a> FilterBuilder<'a> {
    /// Create a builder over a classification table and a target backend.
    pub fn new(classification: &'a FieldClassification, provider: DatabaseProvider) -> Self {
        Self {
            classification,
            provider,
        }
    }

    /// Build the subtree for one triple.
    ///
    /// Returns `None` when the field path is empty.
    pub fn build(&self, triple: &FilterTriple) -> Option<FilterNode> {
        let fields = triple.fields.as_slice();
        let root = fields.first()?.as_str();
        let value = &triple.value;

        let Some(operator) = triple.operator else {
            if fields.len() == 2 && root == ORDER_BY_KEY {
                return Some(FilterNode::wrap(
                    fields,
                    FilterNode::Equals(FilterValue::from(value.clone())),
                ));
            }
            return Some(FilterNode::wrap(
                fields,
                FilterNode::Equals(self.classification.coerce(root, value)),
            ));
        };

        if operator == FilterOperator::Or {
            return Some(self.build_or(fields, root, value));
        }

        let condition = self.build_condition(operator, root, value)?;
        Some(FilterNode::wrap(fields, FilterNode::condition(condition)))
    }

    fn build_or(&self, fields: &[SmolStr], root: &str, value: &Value) -> FilterNode {
        let alternatives = match value {
            Value::String(s) => s
                .split(LIST_SEPARATOR)
                .map(|part| self.classification.coerce_str(root, part))
                .collect::<Vec<_>>(),
            Value::Array(items) => items
                .iter()
                .map(|item| self.classification.coerce(root, item))
                .collect(),
            other => vec![self.classification.coerce(root, other)],
        };

        let alternatives = alternatives
            .into_iter()
            .map(|v| FilterNode::wrap(fields, FilterNode::Equals(v)))
            .collect();
        FilterNode::wrap([OR_KEY], FilterNode::Or(alternatives))
    }

    fn build_condition(&self, operator: FilterOperator, root: &str, value: &Value) -> Option<Condition> {
        let condition = match operator {
            FilterOperator::Contains | FilterOperator::Icontains => {
                let mode = self.provider.supports_insensitive_mode().then_some(
                    if operator == FilterOperator::Icontains {
                        QueryMode::Insensitive
                    } else {
                        QueryMode::Sensitive
                    },
                );
                Condition::contains(value_text(value), mode)
            }
            FilterOperator::In
            | FilterOperator::NotIn
            | FilterOperator::HasSome
            | FilterOperator::HasEvery => {
                let op = MembershipOp::from_operator(operator)?;
                Condition::membership(op, self.split_list(root, value))
            }
            FilterOperator::IsNull if is_truthy(value) => {
                Condition::compare(CompareOp::Equals, FilterValue::Null)
            }
            FilterOperator::IsEmpty if is_truthy(value) => {
                Condition::compare(CompareOp::Equals, FilterValue::String(String::new()))
            }
            FilterOperator::IsNull | FilterOperator::IsEmpty => Condition::Unset,
            other => {
                let op = CompareOp::from_operator(other)?;
                let value = match value {
                    Value::Null => FilterValue::Null,
                    v => self.classification.coerce(root, v),
                };
                Condition::compare(op, value)
            }
        };
        Some(condition)
    }

    fn split_list(&self, root: &str, value: &Value) -> Vec<FilterValue> {
        match value {
            Value::String(s) => s
                .split(LIST_SEPARATOR)
                .map(|part| self.classification.coerce_str(root, part.trim()))
                .collect(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => self.classification.coerce_str(root, s.trim()),
                    other => FilterValue::from(other.clone()),
                })
                .collect(),
            other => vec![self.classification.coerce(root, other)],
        }
    }
}

/// `"true"` in any case, or a JSON `true`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
