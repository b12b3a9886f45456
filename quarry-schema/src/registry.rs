//! Memoized schema documents.
//!
//! A [`SchemaRegistry`] is created by the process entry point and handed to
//! every consumer that needs the parsed schema. Loading the same text twice
//! returns the cached document; a re-parse happens only when it is forced or
//! when different text is loaded.
//!
//! ```rust
//! use quarry_schema::registry::SchemaRegistry;
//!
//! let registry = SchemaRegistry::new();
//! let first = registry.load("model User { id Int @id }");
//! let second = registry.load("model User { id Int @id }");
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! assert_eq!(registry.stats().hits, 1);
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::ast::SchemaDocument;
use crate::error::{SchemaError, SchemaResult};
use crate::loader::{DEFAULT_EXTENSIONS, read_schema_source};
use crate::parser::parse_schema;

/// Where the current document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Text handed to [`SchemaRegistry::load`].
    Text(Arc<str>),
    /// A file or directory handed to [`SchemaRegistry::load_path`].
    Path {
        /// File or directory.
        path: PathBuf,
        /// Extensions collected from a directory.
        extensions: Vec<String>,
    },
}

#[derive(Debug)]
struct Entry {
    hash: u64,
    origin: SchemaOrigin,
    document: Arc<SchemaDocument>,
}

/// Statistics for the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Loads answered from the cached document.
    pub hits: u64,
    /// Loads that parsed text.
    pub misses: u64,
}

impl RegistryStats {
    /// Fraction of loads answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Holder of the parsed schema document for a process.
///
/// The registry is internally synchronized: concurrent readers share one
/// `Arc<SchemaDocument>`, and a reload swaps the document atomically.
/// Documents already handed out stay valid after a reload.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entry: RwLock<Option<Entry>>,
    stats: RwLock<RegistryStats>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, or return the cached document if it was parsed from
    /// the same text.
    pub fn load(&self, source: &str) -> Arc<SchemaDocument> {
        self.load_with(source, false)
    }

    /// Like [`load`](Self::load), re-parsing unconditionally when
    /// `force_refresh` is set.
    pub fn load_with(&self, source: &str, force_refresh: bool) -> Arc<SchemaDocument> {
        let hash = hash_source(source);
        if !force_refresh {
            if let Some(doc) = self.cached(hash) {
                return doc;
            }
        }
        self.store(hash, SchemaOrigin::Text(Arc::from(source)), source)
    }

    /// Load a schema file, or every `.prisma` file under a directory.
    pub fn load_path(&self, path: impl AsRef<Path>) -> SchemaResult<Arc<SchemaDocument>> {
        self.load_path_with(path, DEFAULT_EXTENSIONS)
    }

    /// Load a schema file or directory, collecting the given extensions.
    pub fn load_path_with(
        &self,
        path: impl AsRef<Path>,
        extensions: &[impl AsRef<str>],
    ) -> SchemaResult<Arc<SchemaDocument>> {
        let path = path.as_ref();
        let source = read_schema_source(path, extensions)?;
        let hash = hash_source(&source);
        if let Some(doc) = self.cached(hash) {
            return Ok(doc);
        }

        let origin = SchemaOrigin::Path {
            path: path.to_path_buf(),
            extensions: extensions.iter().map(|e| e.as_ref().to_string()).collect(),
        };
        Ok(self.store(hash, origin, &source))
    }

    /// Re-parse the current document from its origin.
    ///
    /// Files are read again, so edits on disk are picked up.
    pub fn reload(&self) -> SchemaResult<Arc<SchemaDocument>> {
        let origin = self
            .entry
            .read()
            .as_ref()
            .map(|e| e.origin.clone())
            .ok_or(SchemaError::NothingLoaded)?;

        match origin {
            SchemaOrigin::Text(text) => {
                let hash = hash_source(&text);
                Ok(self.store(hash, SchemaOrigin::Text(text.clone()), &text))
            }
            SchemaOrigin::Path { path, extensions } => {
                let source = read_schema_source(&path, extensions.as_slice())?;
                let hash = hash_source(&source);
                Ok(self.store(hash, SchemaOrigin::Path { path, extensions }, &source))
            }
        }
    }

    /// The current document, if one was loaded.
    pub fn current(&self) -> Option<Arc<SchemaDocument>> {
        self.entry.read().as_ref().map(|e| Arc::clone(&e.document))
    }

    /// Where the current document came from.
    pub fn origin(&self) -> Option<SchemaOrigin> {
        self.entry.read().as_ref().map(|e| e.origin.clone())
    }

    /// Check whether a document is loaded.
    pub fn is_loaded(&self) -> bool {
        self.entry.read().is_some()
    }

    /// Drop the current document.
    pub fn clear(&self) {
        *self.entry.write() = None;
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    fn cached(&self, hash: u64) -> Option<Arc<SchemaDocument>> {
        let entry = self.entry.read();
        let doc = entry.as_ref().filter(|e| e.hash == hash).map(|e| Arc::clone(&e.document))?;
        self.stats.write().hits += 1;
        Some(doc)
    }

    fn store(&self, hash: u64, origin: SchemaOrigin, source: &str) -> Arc<SchemaDocument> {
        let document = Arc::new(parse_schema(source));
        debug!(stats = %document.stats(), "schema registry updated");

        *self.entry.write() = Some(Entry {
            hash,
            origin,
            document: Arc::clone(&document),
        });
        self.stats.write().misses += 1;
        document
    }
}

fn hash_source(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}
