//! Commit records synthesized from conversation history.
//!
//! There is no commit storage: the only trace of a "commit" is an
//! interpreter response that looks like git's `[branch hash] message` line.
//! That sniffing lives behind [`CommitStrategy`] so it can be swapped out
//! without touching the push protocol.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::workspace::timestamp::format_wire;
use crate::workspace::{HistoryEntry, ROLE_ASSISTANT};

use super::types::CommitRecord;

/// Length of the synthetic hash label.
pub const COMMIT_HASH_LEN: usize = 8;

pub const EXTRACTED_COMMIT_MESSAGE: &str = "Commit from history";
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Short hex label from a hash of the current time in nanoseconds.
///
/// Not deterministic and not content-addressed: identical pushes produce
/// different hashes, so it must never be used for integrity checks.
pub fn generate_commit_hash() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let digest = Sha256::digest(nanos.to_string().as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(COMMIT_HASH_LEN);
    hex
}

/// Derives commit records from the conversation history.
pub trait CommitStrategy {
    fn extract(&self, history: &[HistoryEntry], branch: &str) -> Vec<CommitRecord>;
}

/// Treats every assistant response starting with `[` as one commit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketPrefixStrategy;

impl CommitStrategy for BracketPrefixStrategy {
    fn extract(&self, history: &[HistoryEntry], branch: &str) -> Vec<CommitRecord> {
        history
            .iter()
            .filter(|m| m.role == ROLE_ASSISTANT && m.content.starts_with('['))
            .map(|m| CommitRecord {
                hash: generate_commit_hash(),
                message: EXTRACTED_COMMIT_MESSAGE.to_string(),
                branch: branch.to_string(),
                timestamp: format_wire(&m.timestamp),
            })
            .collect()
    }
}

/// Commits for a push: whatever the strategy finds, or exactly one
/// placeholder stamped with the latest history record (or `now`).
pub fn derive_commits(
    strategy: &impl CommitStrategy,
    history: &[HistoryEntry],
    branch: &str,
    now: DateTime<Utc>,
) -> Vec<CommitRecord> {
    let commits = strategy.extract(history, branch);
    if !commits.is_empty() {
        return commits;
    }

    let stamp = history.last().map(|m| m.timestamp).unwrap_or(now);
    vec![CommitRecord {
        hash: generate_commit_hash(),
        message: INITIAL_COMMIT_MESSAGE.to_string(),
        branch: branch.to_string(),
        timestamp: format_wire(&stamp),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::ROLE_USER;
    use chrono::TimeZone;

    fn entry(role: &str, content: &str, day: u32) -> HistoryEntry {
        HistoryEntry {
            role: role.to_string(),
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_commit_hash_shape() {
        let hash = generate_commit_hash();
        assert_eq!(hash.len(), COMMIT_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_one_bracket_response_yields_one_commit() {
        let history = vec![
            entry(ROLE_USER, "Command: git commit -m first", 1),
            entry(ROLE_ASSISTANT, "[main 1a2b3c4] first\n 1 file changed", 2),
            entry(ROLE_USER, "[not from the assistant]", 3),
            entry(ROLE_ASSISTANT, "On branch main", 4),
        ];

        let commits = derive_commits(&BracketPrefixStrategy, &history, "main", Utc::now());

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, EXTRACTED_COMMIT_MESSAGE);
        assert_eq!(commits[0].branch, "main");
        assert_eq!(commits[0].timestamp, "2024-06-02T12:00:00Z");
    }

    #[test]
    fn test_no_bracket_response_yields_placeholder_from_last_record() {
        let history = vec![
            entry(ROLE_USER, "Command: git status", 1),
            entry(ROLE_ASSISTANT, "nothing to commit", 5),
        ];

        let commits = derive_commits(&BracketPrefixStrategy, &history, "dev", Utc::now());

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, INITIAL_COMMIT_MESSAGE);
        assert_eq!(commits[0].branch, "dev");
        assert_eq!(commits[0].timestamp, "2024-06-05T12:00:00Z");
    }

    #[test]
    fn test_empty_history_placeholder_uses_send_time() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let commits = derive_commits(&BracketPrefixStrategy, &[], "main", now);

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].timestamp, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_custom_strategy_replaces_heuristic() {
        struct Never;
        impl CommitStrategy for Never {
            fn extract(&self, _: &[HistoryEntry], _: &str) -> Vec<CommitRecord> {
                Vec::new()
            }
        }

        let history = vec![entry(ROLE_ASSISTANT, "[main 1a2b3c4] first", 1)];
        let commits = derive_commits(&Never, &history, "main", Utc::now());

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, INITIAL_COMMIT_MESSAGE);
    }
}
