//! Schema text parser.
//!
//! Parsing runs in two passes. The first pass extracts every `model` and
//! `enum` block and records their names; the second parses each block body
//! with the complete name set, so a field that refers to a model declared
//! further down the text is still resolved as a relation.
//!
//! Parsing never fails. Malformed blocks and field declarations are dropped
//! and logged at `debug` level.

mod attribute;
mod block;
mod default;
mod extract;
mod grammar;
mod lexer;

use std::path::Path;

use tracing::{debug, warn};

use crate::ast::SchemaDocument;
use crate::error::{SchemaError, SchemaResult};

pub use attribute::{attribute_name, first_argument_text, parse_attribute, relation_connection_field};
pub use block::{NameSet, parse_enum_block, parse_model_block};
pub use default::{convert_default_literal, default_from_token};
pub use extract::{ExtractedBlocks, RawBlock, extract_blocks};
pub use grammar::{AttributeParser, Rule};

/// Parse schema text into a document.
pub fn parse_schema(source: &str) -> SchemaDocument {
    let blocks = extract_blocks(source);

    let mut names = NameSet::new();
    for block in &blocks.models {
        names.add_model(block.name);
    }
    for block in &blocks.enums {
        names.add_enum(block.name);
    }

    let mut doc = SchemaDocument::new();

    for block in &blocks.enums {
        if !doc.add_enum(parse_enum_block(block)) {
            warn!(name = block.name, "duplicate enum declaration ignored");
        }
    }
    for block in &blocks.models {
        if doc.get_model(block.name).is_some() {
            warn!(name = block.name, "duplicate model declaration ignored");
            continue;
        }
        doc.add_model(parse_model_block(block, &names));
    }

    debug!(
        models = doc.models.len(),
        enums = doc.enums.len(),
        "parsed schema"
    );
    doc
}

/// Read and parse a single schema file.
pub fn parse_schema_file(path: impl AsRef<Path>) -> SchemaResult<SchemaDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SchemaError::not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    Ok(parse_schema(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DefaultValue, FieldKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_schema() {
        let doc = parse_schema("");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_minimal_model() {
        let doc = parse_schema("model X { id Int @id }");
        let model = doc.get_model("X").unwrap();

        assert_eq!(model.fields.len(), 1);
        assert_eq!(model.fields[0].name(), "id");
        assert!(model.fields[0].is_id);
    }

    #[test]
    fn test_forward_relation_is_resolved() {
        let doc = parse_schema(
            r#"
model Post {
  id       Int  @id
  author   User @relation(fields: [authorId], references: [id])
  authorId Int
}

model User {
  id    Int    @id
  posts Post[]
  role  Role   @default(MEMBER)
}

enum Role {
  MEMBER
  ADMIN
}
"#,
        );

        let author = doc.get_model("Post").unwrap().field("author").unwrap();
        assert!(author.is_relation);
        assert_eq!(author.kind, FieldKind::Relation);
        assert_eq!(author.connection_field.as_deref(), Some("authorId"));

        let user = doc.get_model("User").unwrap();
        assert!(user.field("posts").unwrap().is_relation);
        assert_eq!(user.field("role").unwrap().kind, FieldKind::Enum);
        assert_eq!(
            user.field("role").unwrap().default_value,
            Some(DefaultValue::EnumLiteral("MEMBER".into()))
        );
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let doc = parse_schema(
            "model A { first Int }\nmodel A { second Int }\nenum E { X }\nenum E { Y }",
        );

        assert_eq!(doc.models.len(), 1);
        assert!(doc.get_model("A").unwrap().field("first").is_some());
        assert_eq!(doc.get_enum("E").unwrap().values, vec!["X"]);
    }

    #[test]
    fn test_other_blocks_are_ignored() {
        let doc = parse_schema(
            r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

generator client {
  provider = "prisma-client-js"
}

model A { id Int @id }
"#,
        );
        assert_eq!(doc.model_names().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_parse_schema_file_missing() {
        let err = parse_schema_file("/definitely/not/here.prisma").unwrap_err();
        assert!(matches!(err, SchemaError::SchemaNotFound { .. }));
    }

    #[test]
    fn test_parse_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.prisma");
        std::fs::write(&path, "model A { id Int @id }").unwrap();

        let doc = parse_schema_file(&path).unwrap();
        assert_eq!(doc.models.len(), 1);
    }
}
