use anyhow::Result;

use crate::config::ConfigKey;
use crate::workspace::Workspace;

pub fn run_config_set(workspace: &Workspace, key: &str, value: &str) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    workspace.config().set(key, value)?;
    println!("Set {}", key);
    Ok(())
}

pub fn run_config_get(workspace: &Workspace, key: &str) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    println!("{}", workspace.config().get(key)?);
    Ok(())
}
