use anyhow::{bail, Context, Result};

use crate::config::ConfigKey;
use crate::remote::{pull_workspace, push_workspace, BracketPrefixStrategy, RemoteClient};
use crate::workspace::Workspace;

pub async fn run_remote_create(workspace: &Workspace, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("repository name cannot be empty");
    }

    let config = workspace.config().load()?;
    let client = RemoteClient::from_settings(&config.remote)?;

    println!("Creating repository '{}' on remote...", name);
    let repo_id = client
        .create_repository(name)
        .await
        .context("failed to create repository")?;
    println!("✓ Repository created successfully!");
    println!("  Repository ID: {}", repo_id);

    workspace
        .config()
        .set(ConfigKey::RemoteRepoId, &repo_id)
        .context("failed to save repository ID to config")?;
    println!("✓ Configured {}: {}", ConfigKey::RemoteRepoId, repo_id);
    println!("\nYou can now push to this repository:\n  gitr push");

    Ok(())
}

pub async fn run_push(workspace: &Workspace) -> Result<()> {
    let config = workspace.config().load()?;
    let client = RemoteClient::from_settings(&config.remote)?;
    let repo_id = config.remote.require_repo_id()?;

    println!("Pushing to remote...");
    let summary = push_workspace(workspace, &client, repo_id, &BracketPrefixStrategy)
        .await
        .context("push failed")?;

    println!("✓ Successfully pushed to remote (branch: {})", summary.branch);
    println!("  Commits: {}", summary.commit_count);
    println!("  Files: {}", summary.file_count);
    println!("  History: {} messages", summary.message_count);
    Ok(())
}

pub async fn run_pull(workspace: &Workspace) -> Result<()> {
    let config = workspace.config().load()?;
    let client = RemoteClient::from_settings(&config.remote)?;
    let repo_id = config.remote.require_repo_id()?;

    println!("Pulling from remote...");
    let summary = pull_workspace(workspace, &client, repo_id)
        .await
        .context("pull failed")?;

    println!("✓ Successfully pulled from remote (branch: {})", summary.branch);
    println!("  Files: {}", summary.file_count);
    println!("  History: {} messages", summary.message_count);
    Ok(())
}
