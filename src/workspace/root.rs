//! Workspace root discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::MARKER_DIR;

/// Walk upward from `start` to the nearest directory containing the marker.
///
/// Stops with [`Error::NotFound`] once the parent of a directory is the
/// directory itself (or there is no parent), so it never loops and never
/// looks at siblings.
pub fn find_root(start: &Path) -> Result<PathBuf> {
    let mut dir = start;

    loop {
        if dir.join(MARKER_DIR).is_dir() {
            debug!("Found workspace root: {}", dir.display());
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => {
                return Err(Error::NotFound {
                    start: start.to_path_buf(),
                })
            }
        }
    }
}
