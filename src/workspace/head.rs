//! Current branch pointer persisted in `.gitr/HEAD`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

use super::persist::write_atomic;

pub const HEAD_FILE: &str = "HEAD";
pub const DEFAULT_BRANCH: &str = "main";

pub struct BranchPointer {
    path: PathBuf,
}

impl BranchPointer {
    pub fn new(marker_dir: &Path) -> Self {
        Self {
            path: marker_dir.join(HEAD_FILE),
        }
    }

    /// Current branch, or [`DEFAULT_BRANCH`] when unset.
    pub fn get(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let name = raw.trim();
                if name.is_empty() {
                    Ok(DEFAULT_BRANCH.to_string())
                } else {
                    Ok(name.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DEFAULT_BRANCH.to_string()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Point at `name`. No shape validation beyond non-empty.
    pub fn set(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::EmptyBranchName);
        }
        write_atomic(&self.path, name.as_bytes())?;
        info!("Branch pointer set to {}", name);
        Ok(())
    }
}
