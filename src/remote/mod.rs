//! Synchronization with the remote repository service.
//!
//! Wire protocol (JSON over HTTP):
//! - `POST {base}/api/repos` with `{"name"}` returns `{"id"}`
//! - `POST {base}/api/repos/{id}/push` with branch, commits, files, history
//! - `GET {base}/api/repos/{id}/pull` returns branch, files, history

mod client;
mod commits;
mod sync;
mod types;

pub(crate) use client::{build_http_client, build_url, read_body};
pub use client::RemoteClient;
pub use commits::BracketPrefixStrategy;
pub use sync::{pull_workspace, push_workspace};
