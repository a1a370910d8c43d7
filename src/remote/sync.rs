//! Push and pull orchestration between a workspace and the remote service.
//!
//! Push reads branch, snapshot and history, derives commits and posts them.
//! Pull replaces local state: branch pointer, then files, then the whole
//! history. Those are separate writes with no transaction; a failure part
//! way through leaves earlier writes in place.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::Result;
use crate::workspace::{History, Workspace};

use super::client::RemoteClient;
use super::commits::{derive_commits, CommitStrategy};
use super::types::{PullPayload, PushPayload, WireMessage};

/// Summary of a completed push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSummary {
    pub branch: String,
    pub commit_count: usize,
    pub file_count: usize,
    pub message_count: usize,
}

/// Summary of an applied pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub branch: String,
    pub file_count: usize,
    pub message_count: usize,
}

/// Assemble the push payload from local state.
pub fn build_push_payload(
    workspace: &Workspace,
    strategy: &impl CommitStrategy,
) -> Result<PushPayload> {
    let branch = workspace.head().get()?;
    let files = workspace.snapshot()?;
    let history = workspace.history().load()?;

    let commits = derive_commits(strategy, &history.messages, &branch, Utc::now());
    debug!("Derived {} commit(s) for {}", commits.len(), branch);

    Ok(PushPayload {
        branch,
        commits,
        files,
        history: history.messages.iter().map(WireMessage::from).collect(),
    })
}

pub async fn push_workspace(
    workspace: &Workspace,
    client: &RemoteClient,
    repo_id: &str,
    strategy: &impl CommitStrategy,
) -> Result<PushSummary> {
    let payload = build_push_payload(workspace, strategy)?;
    client.push(repo_id, &payload).await?;

    info!("Pushed branch {} to {}", payload.branch, client.base_url());
    Ok(PushSummary {
        branch: payload.branch,
        commit_count: payload.commits.len(),
        file_count: payload.files.len(),
        message_count: payload.history.len(),
    })
}

/// Apply a pulled payload to the workspace.
///
/// Every history timestamp and every file path is checked before anything
/// is written, so a bad timestamp or an unsafe path leaves the workspace
/// untouched.
pub fn apply_pull(workspace: &Workspace, payload: PullPayload) -> Result<PullSummary> {
    let messages = payload
        .history
        .into_iter()
        .map(WireMessage::into_entry)
        .collect::<Result<Vec<_>>>()?;
    for path in payload.files.keys() {
        workspace.resolve_relative(path)?;
    }

    workspace.head().set(&payload.branch)?;

    for (path, content) in &payload.files {
        workspace.write_file(path, content)?;
        debug!("Wrote {}", path);
    }

    let history = History { messages };
    workspace.history().save(&history)?;

    Ok(PullSummary {
        branch: payload.branch,
        file_count: payload.files.len(),
        message_count: history.len(),
    })
}

pub async fn pull_workspace(
    workspace: &Workspace,
    client: &RemoteClient,
    repo_id: &str,
) -> Result<PullSummary> {
    let payload = client.pull(repo_id).await?;
    let summary = apply_pull(workspace, payload)?;

    info!(
        "Pulled branch {} ({} files, {} messages)",
        summary.branch, summary.file_count, summary.message_count
    );
    Ok(summary)
}
