//! Snapshot of tracked files for interpreter context and push payloads.
//!
//! Uses `walkdir` with `filter_entry` so excluded directories are pruned
//! without descent. Oversized and binary files are skipped with a warning;
//! any other I/O failure aborts the whole snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

use super::MARKER_DIR;

/// Maximum file size to include (1 MiB).
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Number of leading bytes inspected for a NUL when sniffing binaries.
pub const BINARY_SNIFF_LEN: usize = 512;

/// Marker directories of other version-control tools that are never walked.
pub const LEGACY_MARKER_DIRS: &[&str] = &[".git"];

/// Relative path (forward slashes) to file content.
pub type Snapshot = BTreeMap<String, String>;

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Check whether a walk entry (below the root) should be pruned.
fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    let name: &str = &name;
    if entry.file_type().is_dir() && (name == MARKER_DIR || LEGACY_MARKER_DIRS.contains(&name)) {
        return true;
    }

    is_hidden_name(name)
}

fn walk_error(err: walkdir::Error, fallback: &Path) -> Error {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    Error::io(path, source)
}

fn looks_binary(content: &[u8]) -> bool {
    let len = content.len().min(BINARY_SNIFF_LEN);
    content[..len].contains(&0)
}

/// Relative path of `path` under `root`, joined with `/`.
fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Build the path-to-content mapping for every tracked file under `root`.
pub fn snapshot(root: &Path) -> Result<Snapshot> {
    let mut files = Snapshot::new();

    debug!("Building snapshot of {}", root.display());

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e, root))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let size = entry.metadata().map_err(|e| walk_error(e, path))?.len();

        if size > MAX_FILE_SIZE {
            warn!(
                "Skipping large file: {} ({:.2} MB)",
                path.display(),
                size as f64 / (1024.0 * 1024.0)
            );
            continue;
        }

        let content = fs::read(path).map_err(|e| Error::io(path, e))?;

        if looks_binary(&content) {
            warn!("Skipping binary file: {}", path.display());
            continue;
        }

        let Some(key) = relative_key(path, root) else {
            warn!("Failed to get relative path for {}", path.display());
            continue;
        };

        files.insert(key, String::from_utf8_lossy(&content).into_owned());
    }

    debug!("Snapshot contains {} files", files.len());

    Ok(files)
}
