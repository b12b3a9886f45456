//! The closed filter operator vocabulary.

use serde::{Deserialize, Serialize};

/// An operator that may end a filter key.
///
/// Matching is exact and case-sensitive: `notIn` is an operator, `notin` is
/// a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Case-insensitive substring match.
    Icontains,
    /// Substring match.
    Contains,
    /// Value is one of a list.
    In,
    /// Value is none of a list.
    NotIn,
    /// List field shares an element with a list.
    HasSome,
    /// List field contains every element of a list.
    HasEvery,
    /// Disjunction over comma-separated values.
    Or,
    /// Null check gated on a `"true"` value.
    IsNull,
    /// Empty-string check gated on a `"true"` value.
    IsEmpty,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Explicit equality.
    Equals,
    /// String prefix.
    StartsWith,
    /// String suffix.
    EndsWith,
    /// Negation.
    Not,
    /// Some related record matches.
    Some,
    /// No related record matches.
    None,
    /// Every related record matches.
    Every,
}

impl FilterOperator {
    /// Every operator, in vocabulary order.
    pub const ALL: [FilterOperator; 20] = [
        Self::Icontains,
        Self::Contains,
        Self::In,
        Self::NotIn,
        Self::HasSome,
        Self::HasEvery,
        Self::Or,
        Self::IsNull,
        Self::IsEmpty,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Equals,
        Self::StartsWith,
        Self::EndsWith,
        Self::Not,
        Self::Some,
        Self::None,
        Self::Every,
    ];

    /// Look up an operator by its key spelling.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// The spelling used in filter keys and in the compiled tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icontains => "icontains",
            Self::Contains => "contains",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::HasSome => "hasSome",
            Self::HasEvery => "hasEvery",
            Self::Or => "or",
            Self::IsNull => "isNull",
            Self::IsEmpty => "isEmpty",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Equals => "equals",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Not => "not",
            Self::Some => "some",
            Self::None => "none",
            Self::Every => "every",
        }
    }

    /// Check whether a string is in the vocabulary.
    pub fn is_operator(s: &str) -> bool {
        Self::from_str(s).is_some()
    }

    /// Operators whose value is split into a list.
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::HasSome | Self::HasEvery)
    }

    /// Operators compiled to a substring match.
    pub fn is_containment(&self) -> bool {
        matches!(self, Self::Contains | Self::Icontains)
    }

    /// Operators applied to related records.
    pub fn is_relation_filter(&self) -> bool {
        matches!(self, Self::Some | Self::None | Self::Every)
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
