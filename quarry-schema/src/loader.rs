//! Collecting schema text from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{SchemaError, SchemaResult};

/// Extensions collected when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["prisma"];

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["migrations"];

/// Read every schema file under `dir` and concatenate the contents.
///
/// The walk is recursive and skips `migrations` directories. Files are read
/// in sorted path order and joined with a newline, so the result does not
/// depend on directory iteration order.
pub fn collect_schema_source(dir: impl AsRef<Path>, extensions: &[impl AsRef<str>]) -> SchemaResult<String> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SchemaError::not_found(dir));
    }

    let mut files = Vec::new();
    walk(dir, extensions, &mut files)?;
    files.sort();

    let mut parts = Vec::with_capacity(files.len());
    for file in &files {
        trace!(path = %file.display(), "reading schema file");
        parts.push(std::fs::read_to_string(file).map_err(|e| SchemaError::io(file, e))?);
    }

    debug!(dir = %dir.display(), files = files.len(), "collected schema source");
    Ok(parts.join("\n"))
}

/// Read schema text from a file, or from every schema file under a directory.
pub fn read_schema_source(path: impl AsRef<Path>, extensions: &[impl AsRef<str>]) -> SchemaResult<String> {
    let path = path.as_ref();
    if path.is_dir() {
        collect_schema_source(path, extensions)
    } else if path.is_file() {
        std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))
    } else {
        Err(SchemaError::not_found(path))
    }
}

fn walk(dir: &Path, extensions: &[impl AsRef<str>], out: &mut Vec<PathBuf>) -> SchemaResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| SchemaError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SchemaError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| SKIPPED_DIRS.contains(&n));
            if skipped {
                trace!(path = %path.display(), "skipping directory");
                continue;
            }
            walk(&path, extensions, out)?;
        } else if has_extension(&path, extensions) {
            out.push(path);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.as_ref().trim_start_matches('.') == ext))
}
