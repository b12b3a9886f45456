//! Model and enum descriptors.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{FieldDescriptor, Span};

/// A parsed `model Name { ... }` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Model name.
    pub name: SmolStr,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Storage name override from `@@map("...")`.
    pub map_name: Option<String>,
    /// Source location of the whole block.
    pub span: Span,
}

impl ModelDescriptor {
    /// Create an empty model.
    pub fn new(name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            name: name.into(),
            fields: vec![],
            map_name: None,
            span,
        }
    }

    /// Get the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Primary key fields.
    pub fn id_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_id)
    }

    /// Relation fields.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_relation)
    }

    /// Non-relation fields.
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_relation)
    }

    /// Storage name: the `@@map` override or the model name.
    pub fn table_name(&self) -> &str {
        self.map_name.as_deref().unwrap_or(&self.name)
    }
}

/// A parsed `enum Name { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Enum name.
    pub name: SmolStr,
    /// Values in declaration order.
    pub values: Vec<SmolStr>,
    /// Source location of the whole block.
    pub span: Span,
}

impl EnumDescriptor {
    /// Create an empty enum.
    pub fn new(name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            name: name.into(),
            values: vec![],
            span,
        }
    }

    /// Get the enum name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a value is declared.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Position of a value in declaration order.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}
