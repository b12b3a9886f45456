//! The root value produced by parsing schema text.

use serde::{Deserialize, Serialize};

use super::{EnumDescriptor, ModelDescriptor};

/// All models and enums found in a body of schema text.
///
/// Names are unique: when a name is declared twice the first declaration is
/// kept and later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Models in declaration order.
    pub models: Vec<ModelDescriptor>,
    /// Enums in declaration order.
    pub enums: Vec<EnumDescriptor>,
}

impl SchemaDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model. Returns `false` if the name was already taken.
    pub fn add_model(&mut self, model: ModelDescriptor) -> bool {
        if self.get_model(model.name()).is_some() {
            return false;
        }
        self.models.push(model);
        true
    }

    /// Add an enum. Returns `false` if the name was already taken.
    pub fn add_enum(&mut self, e: EnumDescriptor) -> bool {
        if self.get_enum(e.name()).is_some() {
            return false;
        }
        self.enums.push(e);
        true
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Get a model by its storage name (`@@map`) or its own name.
    pub fn find_model_by_table(&self, table: &str) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.map_name.as_deref() == Some(table) || m.name == table)
    }

    /// Get an enum by name.
    pub fn get_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// All model names.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name())
    }

    /// All enum names.
    pub fn enum_names(&self) -> impl Iterator<Item = &str> {
        self.enums.iter().map(|e| e.name())
    }

    /// Check if the document has no models and no enums.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.enums.is_empty()
    }

    /// Get statistics about the document.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            model_count: self.models.len(),
            enum_count: self.enums.len(),
            field_count: self.models.iter().map(|m| m.fields.len()).sum(),
            relation_count: self
                .models
                .iter()
                .map(|m| m.relation_fields().count())
                .sum(),
        }
    }
}

/// Document statistics for summaries and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Number of models.
    pub model_count: usize,
    /// Number of enums.
    pub enum_count: usize,
    /// Total number of fields across all models.
    pub field_count: usize,
    /// Number of relation fields across all models.
    pub relation_count: usize,
}

impl std::fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} models, {} enums, {} fields, {} relations",
            self.model_count, self.enum_count, self.field_count, self.relation_count
        )
    }
}

impl std::fmt::Display for SchemaDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SchemaDocument({})", self.stats())
    }
}
