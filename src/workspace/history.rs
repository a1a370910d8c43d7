//! Append-only conversation log persisted in `.gitr/history.json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::persist::{read_json_object, write_json};
use super::timestamp;

pub const HISTORY_FILE: &str = "history.json";

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    #[serde(with = "timestamp::serde_canonical")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered records; order is append order and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

impl History {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(marker_dir: &Path) -> Self {
        Self {
            path: marker_dir.join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the log; an absent file is an empty history.
    pub fn load(&self) -> Result<History> {
        read_json_object(&self.path)
    }

    /// Replace the whole log.
    pub fn save(&self, history: &History) -> Result<()> {
        write_json(&self.path, history)
    }

    /// Load, append one record stamped now, save. Assumes a single writer.
    pub fn append(&self, role: &str, content: &str) -> Result<()> {
        let mut history = self.load()?;
        history.messages.push(HistoryEntry::new(role, content));
        self.save(&history)?;
        debug!(
            "Appended {} message to {} ({} total)",
            role,
            self.path().display(),
            history.len()
        );
        Ok(())
    }
}
