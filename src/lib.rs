//! # Quarry
//!
//! Schema parsing and query-parameter filter compilation for Prisma-style
//! data models.
//!
//! Quarry provides:
//! - A tolerant parser turning schema text into model, field and enum descriptors
//! - A memoized schema registry owned by the process entry point
//! - A compiler turning flat query parameters such as `author__name__icontains=jo`
//!   into nested filter trees for downstream query builders
//!
//! ## Quick Start
//!
//! ```rust
//! use quarry::prelude::*;
//!
//! let registry = SchemaRegistry::new();
//! let doc = registry.load(r#"
//!     model User {
//!         id        Int      @id @default(autoincrement())
//!         age       Int
//!         createdAt DateTime @default(now())
//!     }
//! "#);
//!
//! let user = doc.get_model("User").unwrap();
//! let compiler = FilterCompiler::new()
//!     .with_classification(FieldClassification::from_model(user));
//!
//! let tree = compiler.compile_query_string("age__gte=21&createdAt__lt=2024-01-01");
//! assert_eq!(
//!     tree.to_json(),
//!     serde_json::json!({
//!         "age": {"gte": 21},
//!         "createdAt": {"lt": "2024-01-01T00:00:00Z"}
//!     })
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema parsing, descriptors and configuration.
pub mod schema {
    pub use quarry_schema::*;
}

/// Filter compilation.
pub mod query {
    pub use quarry_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::prelude::*;
    pub use crate::schema::{
        DatabaseProvider, FieldDescriptor, ModelDescriptor, QuarryConfig, SchemaDocument,
        SchemaRegistry, parse_schema, parse_schema_file,
    };
}

// Re-export key types at the crate root
pub use query::{FilterCompiler, FilterNode, QueryError};
pub use schema::{SchemaDocument, SchemaError, SchemaRegistry};
