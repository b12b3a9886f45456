//! Shared type definitions for the schema descriptors.

use serde::{Deserialize, Serialize};

/// A byte range in the schema source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset in bytes.
    pub start: usize,
    /// End offset in bytes.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span by a base offset.
    pub fn offset(self, base: usize) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// Slice the given source with this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// Scalar keywords understood by the schema dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Floating point number.
    Float,
    /// Arbitrary precision decimal.
    Decimal,
    /// Text.
    String,
    /// Boolean.
    Boolean,
    /// Timestamp.
    DateTime,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// JSON document.
    Json,
    /// Binary data.
    Bytes,
    /// UUID.
    Uuid,
}

impl ScalarType {
    /// Parse a scalar keyword.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Int" => Some(Self::Int),
            "BigInt" => Some(Self::BigInt),
            "Float" => Some(Self::Float),
            "Decimal" => Some(Self::Decimal),
            "String" => Some(Self::String),
            "Boolean" | "Bool" => Some(Self::Boolean),
            "DateTime" => Some(Self::DateTime),
            "Date" => Some(Self::Date),
            "Time" => Some(Self::Time),
            "Json" => Some(Self::Json),
            "Bytes" => Some(Self::Bytes),
            "Uuid" | "UUID" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Get the keyword as written in schema text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::BigInt => "BigInt",
            Self::Float => "Float",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Json => "Json",
            Self::Bytes => "Bytes",
            Self::Uuid => "Uuid",
        }
    }

    /// Whether values of this type are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::BigInt | Self::Float | Self::Decimal)
    }

    /// Whether values of this type are dates or times.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime | Self::Date | Self::Time)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a field's type name resolved to once every block name is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "scalar", rename_all = "camelCase")]
pub enum FieldKind {
    /// A scalar keyword.
    Scalar(ScalarType),
    /// A reference to an enum declared in the same document.
    Enum,
    /// A reference to a model declared in the same document.
    Relation,
    /// Anything else (composite types, typos, unsupported types).
    Unknown,
}

impl FieldKind {
    /// Resolve a bare type name against the known model and enum names.
    pub fn resolve(
        type_name: &str,
        is_model: impl Fn(&str) -> bool,
        is_enum: impl Fn(&str) -> bool,
    ) -> Self {
        if is_model(type_name) {
            Self::Relation
        } else if is_enum(type_name) {
            Self::Enum
        } else if let Some(scalar) = ScalarType::from_str(type_name) {
            Self::Scalar(scalar)
        } else {
            Self::Unknown
        }
    }

    /// Get the scalar type, if any.
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }
}

/// Block keywords recognized at the top level of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `model Name { ... }`
    Model,
    /// `enum Name { ... }`
    Enum,
}

impl BlockKind {
    /// Match a keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "model" => Some(Self::Model),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// The keyword text.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Enum => "enum",
        }
    }
}
