use anyhow::Result;
use std::path::Path;

use crate::workspace::{Workspace, MARKER_DIR};

pub fn run_init(dir: &Path) -> Result<()> {
    let workspace = Workspace::init(dir)?;
    println!(
        "Initialized empty gitr repository in {}",
        workspace.root().join(MARKER_DIR).display()
    );
    Ok(())
}
