//! Error taxonomy shared by the workspace stores and the remote layer.
//!
//! Lower layers return [`Result`] so callers can match on the failure kind;
//! the command layer wraps these in `anyhow` for rendering.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigKey;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "not a gitr repository (or any parent up to mount point): {}\nRun 'gitr init' to create one",
        .start.display()
    )]
    NotFound { start: PathBuf },

    #[error("gitr repository already exists in {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("{key} is not set. Run: gitr config set {key} <value>")]
    ConfigIncomplete { key: ConfigKey },

    #[error("{key} is not configured. Run: gitr config set {key} <value>")]
    RemoteNotConfigured { key: ConfigKey },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse timestamp: {0}")]
    TimestampParse(String),

    #[error("failed to decode {context} response")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} failed (status {status}): {body}")]
    Protocol {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("branch name cannot be empty")]
    EmptyBranchName,

    #[error("refusing to write outside the workspace: {0}")]
    UnsafePath(String),

    #[error("command interpreter error: {0}")]
    Interpreter(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Parse {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Serialize {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_build_failure_has_own_message() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = Error::HttpClient(source);
        assert_eq!(err.to_string(), "failed to build HTTP client");
    }

    #[test]
    fn test_serialize_failure_is_not_reported_as_parse() {
        let source = serde_json::to_string(&std::collections::BTreeMap::from([((1, 2), 3)]))
            .unwrap_err();
        let err = Error::serialize("/work/.gitr/history.json", source);
        assert_eq!(err.to_string(), "failed to serialize /work/.gitr/history.json");
    }
}
