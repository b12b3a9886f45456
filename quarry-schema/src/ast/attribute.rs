//! Attribute values parsed out of `@name(args)` tokens.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// An attribute argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A string literal, quotes removed.
    String(String),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A boolean literal.
    Boolean(bool),
    /// A bare identifier (enum value, field reference, referential action).
    Ident(SmolStr),
    /// A function call such as `now()` or `autoincrement()`.
    Function(SmolStr, Vec<AttributeValue>),
    /// A bracketed list such as `[authorId]`.
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get the value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Identifier or string text, whichever this value holds.
    ///
    /// Field lists are written both as `[authorId]` and `["authorId"]`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a list.
    pub fn as_array(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// An attribute argument (named or positional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeArg {
    /// Argument name (None for positional arguments).
    pub name: Option<SmolStr>,
    /// Argument value.
    pub value: AttributeValue,
}

impl AttributeArg {
    /// Create a positional argument.
    pub fn positional(value: AttributeValue) -> Self {
        Self { name: None, value }
    }

    /// Create a named argument.
    pub fn named(name: impl Into<SmolStr>, value: AttributeValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    /// Check if this is a positional argument.
    pub fn is_positional(&self) -> bool {
        self.name.is_none()
    }
}

/// A field attribute such as `@id`, `@default(now())` or `@db.VarChar(255)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name without the `@` prefix. Dotted names are kept whole.
    pub name: SmolStr,
    /// Parsed arguments.
    pub args: Vec<AttributeArg>,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<SmolStr>, args: Vec<AttributeArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Create an attribute with no arguments.
    pub fn simple(name: impl Into<SmolStr>) -> Self {
        Self::new(name, vec![])
    }

    /// Get the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this attribute has the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get the first positional argument.
    pub fn first_arg(&self) -> Option<&AttributeValue> {
        self.args.iter().find(|a| a.is_positional()).map(|a| &a.value)
    }

    /// Get a named argument by name.
    pub fn get_arg(&self, name: &str) -> Option<&AttributeValue> {
        self.args
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }
}
