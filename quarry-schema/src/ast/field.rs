//! Field descriptors for parsed models.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Attribute, FieldKind, ScalarType, Span};

/// A statically known `@default(...)` value.
///
/// Database-generated defaults such as `autoincrement()` or `now()` have no
/// literal value and are represented by the absence of a `DefaultValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// A double-quoted string literal.
    String(String),
    /// `true` or `false`.
    Boolean(bool),
    /// An integer literal.
    Int(i64),
    /// A decimal literal.
    Float(f64),
    /// A bare identifier, taken verbatim as an enum value.
    EnumLiteral(SmolStr),
}

impl DefaultValue {
    /// Try to get the value as a string (string literals and enum values).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::EnumLiteral(s) => Some(s),
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

    /// Try to get the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
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
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::EnumLiteral(s) => write!(f, "{}", s),
        }
    }
}

/// A field declared inside a model block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name.
    pub name: SmolStr,
    /// Bare type name with `[]` and `?` removed.
    #[serde(rename = "type")]
    pub field_type: SmolStr,
    /// What the type name refers to.
    pub kind: FieldKind,
    /// Declared with a `[]` suffix.
    pub is_array: bool,
    /// Declared with a `?` marker.
    pub is_optional: bool,
    /// Carries `@id`.
    pub is_id: bool,
    /// Carries `@unique`.
    pub is_unique: bool,
    /// The type names a model of the same document.
    pub is_relation: bool,
    /// Scalar sibling holding the foreign key, from `@relation(fields: [...])`.
    pub connection_field: Option<SmolStr>,
    /// Literal `@default(...)` value.
    pub default_value: Option<DefaultValue>,
    /// Attribute tokens exactly as written.
    pub attributes: Vec<String>,
    /// Attribute tokens that parsed cleanly.
    #[serde(skip)]
    pub parsed_attributes: Vec<Attribute>,
    /// Source location of the declaration.
    pub span: Span,
}

impl FieldDescriptor {
    /// Create a field with no attributes.
    pub fn new(name: impl Into<SmolStr>, field_type: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            kind: FieldKind::Unknown,
            is_array: false,
            is_optional: false,
            is_id: false,
            is_unique: false,
            is_relation: false,
            connection_field: None,
            default_value: None,
            attributes: vec![],
            parsed_attributes: vec![],
            span: Span::default(),
        }
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the bare type name.
    pub fn type_name(&self) -> &str {
        &self.field_type
    }

    /// Scalar type of this field, if it is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.kind.scalar()
    }

    /// Check if a parsed attribute with this name is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.parsed_attributes.iter().any(|a| a.is(name))
    }

    /// Get a parsed attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.parsed_attributes.iter().find(|a| a.is(name))
    }

    /// Column name override from a field-level `@map("...")`.
    pub fn map_name(&self) -> Option<&str> {
        self.get_attribute("map")
            .and_then(|a| a.first_arg())
            .and_then(|v| v.as_string())
    }
}

impl std::fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.field_type)?;
        if self.is_array {
            write!(f, "[]")?;
        }
        if self.is_optional {
            write!(f, "?")?;
        }
        for attr in &self.attributes {
            write!(f, " {}", attr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttributeArg, AttributeValue};

    #[test]
    fn test_default_value_accessors() {
        assert_eq!(DefaultValue::String("a".into()).as_str(), Some("a"));
        assert_eq!(DefaultValue::EnumLiteral("USER".into()).as_str(), Some("USER"));
        assert_eq!(DefaultValue::Int(4).as_int(), Some(4));
        assert_eq!(DefaultValue::Int(4).as_float(), Some(4.0));
        assert_eq!(DefaultValue::Boolean(false).as_bool(), Some(false));
        assert_eq!(DefaultValue::Float(1.5).as_int(), None);
    }

    #[test]
    fn test_default_value_display() {
        assert_eq!(DefaultValue::String("hi".into()).to_string(), "\"hi\"");
        assert_eq!(DefaultValue::EnumLiteral("USER".into()).to_string(), "USER");
        assert_eq!(DefaultValue::Float(3.14).to_string(), "3.14");
    }

    #[test]
    fn test_field_display() {
        let mut field = FieldDescriptor::new("tags", "String");
        field.is_array = true;
        field.attributes.push("@default([])".to_string());
        assert_eq!(field.to_string(), "tags String[] @default([])");

        let mut bio = FieldDescriptor::new("bio", "String");
        bio.is_optional = true;
        assert_eq!(bio.to_string(), "bio String?");
    }

    #[test]
    fn test_map_name() {
        let mut field = FieldDescriptor::new("role", "String");
        field.parsed_attributes.push(Attribute::new(
            "map",
            vec![AttributeArg::positional(AttributeValue::String("user_role".into()))],
        ));
        assert_eq!(field.map_name(), Some("user_role"));
        assert!(field.has_attribute("map"));
        assert!(!field.has_attribute("id"));
    }

    #[test]
    fn test_default_value_serializes_untagged() {
        let json = serde_json::to_string(&DefaultValue::EnumLiteral("ADMIN".into())).unwrap();
        assert_eq!(json, "\"ADMIN\"");
        let json = serde_json::to_string(&DefaultValue::Int(42)).unwrap();
        assert_eq!(json, "42");
    }
}
