//! Wire payloads exchanged with the remote service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::workspace::timestamp::{format_wire, parse_timestamp};
use crate::workspace::HistoryEntry;

/// Create-repository request body
#[derive(Debug, Serialize)]
pub(super) struct CreateRepoRequest<'a> {
    pub name: &'a str,
}

/// Synthetic commit record; `hash` is a display label, not content-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub message: String,
    pub branch: String,
    pub timestamp: String,
}

/// History record as it travels over the wire (timestamp kept textual).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl From<&HistoryEntry> for WireMessage {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            role: entry.role.clone(),
            content: entry.content.clone(),
            timestamp: format_wire(&entry.timestamp),
        }
    }
}

impl WireMessage {
    /// Reparse the textual timestamp into a local history record.
    pub fn into_entry(self) -> Result<HistoryEntry> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        Ok(HistoryEntry {
            role: self.role,
            content: self.content,
            timestamp,
        })
    }
}

/// Push request body
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub branch: String,
    pub commits: Vec<CommitRecord>,
    pub files: BTreeMap<String, String>,
    pub history: Vec<WireMessage>,
}

/// Pull response body
#[derive(Debug, Clone, Deserialize)]
pub struct PullPayload {
    pub branch: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub history: Vec<WireMessage>,
}
