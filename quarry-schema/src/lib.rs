//! # quarry-schema
//!
//! Tolerant parser for Prisma-style schema text.
//!
//! This crate provides:
//! - A brace-balanced extractor for top-level `model` and `enum` blocks
//! - A per-block parser producing model, field and enum descriptors
//! - A memoized [`SchemaRegistry`] owned by the process entry point
//! - A loader that collects schema files from a directory tree
//! - Configuration parsing for `quarry.toml`
//!
//! Parsing never fails: blocks and fields that cannot be understood are
//! dropped and logged through `tracing`.
//!
//! ## Example
//!
//! ```rust
//! use quarry_schema::parse_schema;
//!
//! let doc = parse_schema(r#"
//!     model User {
//!         id    Int     @id @default(autoincrement())
//!         email String  @unique
//!         name  String?
//!         posts Post[]
//!     }
//!
//!     model Post {
//!         id       Int  @id
//!         author   User @relation(fields: [authorId], references: [id])
//!         authorId Int
//!     }
//! "#);
//!
//! let user = doc.get_model("User").unwrap();
//! assert!(user.field("email").unwrap().is_unique);
//! assert!(user.field("posts").unwrap().is_relation);
//!
//! let author = doc.get_model("Post").unwrap().field("author").unwrap();
//! assert_eq!(author.connection_field.as_deref(), Some("authorId"));
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod loader;
pub mod parser;
pub mod registry;

pub use ast::*;
pub use config::{DatabaseProvider, QuarryConfig};
pub use error::{SchemaError, SchemaResult};
pub use loader::collect_schema_source;
pub use parser::{parse_schema, parse_schema_file};
pub use registry::SchemaRegistry;
