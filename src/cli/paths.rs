use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::workspace::Workspace;

/// Directory the command starts from: `--workspace-root` if given, else the
/// current directory.
pub fn resolve_start_dir(workspace_root: Option<String>) -> Result<PathBuf> {
    if let Some(path) = workspace_root {
        PathBuf::from(&path)
            .canonicalize()
            .with_context(|| format!("Failed to canonicalize provided workspace root: {}", path))
    } else {
        std::env::current_dir().context("Failed to get current directory")
    }
}

/// Resolve the enclosing workspace once, at the command boundary.
pub fn resolve_workspace(workspace_root: Option<String>) -> Result<Workspace> {
    let start = resolve_start_dir(workspace_root)?;
    Ok(Workspace::discover(&start)?)
}
