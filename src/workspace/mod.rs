//! Local workspace state.
//!
//! A workspace is a directory tree whose root holds the `.gitr` marker
//! directory. Under the marker live three independent resources:
//! - `config.json`: typed settings (see [`crate::config`])
//! - `history.json`: the append-only conversation log
//! - `HEAD`: the current branch name
//!
//! Each is read and written whole; there is no transaction spanning them, so
//! a failure between two writes can leave them out of step. The file
//! snapshot is computed fresh on every request and never persisted.

mod head;
mod history;
pub mod persist;
mod root;
mod scanner;
#[cfg(test)]
mod tests;
pub mod timestamp;

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::error::{Error, Result};

// Re-exports
pub use head::{BranchPointer, DEFAULT_BRANCH};
pub use history::{History, HistoryEntry, HistoryStore, ROLE_ASSISTANT, ROLE_USER};
pub use root::find_root;
pub use scanner::Snapshot;

/// Name of the marker directory at the workspace root.
pub const MARKER_DIR: &str = ".gitr";

/// Handle on a resolved workspace root. Every store is reached through it,
/// so nothing below the CLI boundary re-derives the root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the marker, an empty history and `HEAD = main` in `dir`.
    pub fn init(dir: &Path) -> Result<Self> {
        let marker = dir.join(MARKER_DIR);
        if marker.exists() {
            return Err(Error::AlreadyInitialized(dir.to_path_buf()));
        }

        fs::create_dir(&marker).map_err(|e| Error::write(&marker, e))?;

        let workspace = Self {
            root: dir.to_path_buf(),
        };

        let seeded = workspace
            .history()
            .save(&History::default())
            .and_then(|_| workspace.head().set(DEFAULT_BRANCH));

        if let Err(e) = seeded {
            if let Err(cleanup) = fs::remove_dir_all(&marker) {
                warn!(
                    "Failed to remove partial marker {}: {}",
                    marker.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        debug!("Initialized workspace at {}", dir.display());
        Ok(workspace)
    }

    /// Resolve the nearest enclosing workspace of `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        Ok(Self {
            root: find_root(start)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn config(&self) -> ConfigStore {
        ConfigStore::new(&self.marker_dir())
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore::new(&self.marker_dir())
    }

    pub fn head(&self) -> BranchPointer {
        BranchPointer::new(&self.marker_dir())
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        scanner::snapshot(&self.root)
    }

    /// Map a workspace-relative path to its location under the root.
    /// Absolute paths, `..` components and paths into the marker directory
    /// are refused with [`Error::UnsafePath`].
    pub fn resolve_relative(&self, relative: &str) -> Result<PathBuf> {
        let relative_path = Path::new(relative);
        let safe = !relative.is_empty()
            && relative_path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && !relative_path
                .components()
                .any(|c| c.as_os_str() == MARKER_DIR);
        if !safe {
            return Err(Error::UnsafePath(relative.to_string()));
        }
        Ok(self.root.join(relative_path))
    }

    /// Write `content` to the workspace-relative `relative` path, creating
    /// parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let target = self.resolve_relative(relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
        fs::write(&target, content).map_err(|e| Error::write(&target, e))
    }
}
