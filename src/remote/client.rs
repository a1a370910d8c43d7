use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::{ConfigKey, RemoteSettings};
use crate::error::{Error, Result};

use super::types::{CreateRepoRequest, PullPayload, PushPayload};

/// Default request timeout in seconds
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI version (from Cargo.toml)
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn user_agent() -> String {
    format!("gitr/{}", VERSION)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn build_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl {
            url: base_url.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .user_agent(user_agent())
        .build()
        .map_err(Error::HttpClient)
}

/// Read the whole body; a body that cannot be read becomes a transport error.
pub(crate) async fn read_body(
    url: &Url,
    response: reqwest::Response,
) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body = response.text().await.map_err(|e| Error::Transport {
        url: url.to_string(),
        source: e,
    })?;
    debug!("Status: {} ({} bytes)", status, body.len());
    Ok((status, body))
}

fn decode<T: DeserializeOwned>(context: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Decode { context, source: e })
}

/// Client for the remote repository service.
///
/// One request per call, no retries; a network failure is returned to the
/// caller as [`Error::Transport`].
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        // Validate early so a bad remote.url fails before any work is done.
        build_url(&base_url, &[])?;
        Ok(Self {
            client: build_http_client()?,
            base_url,
        })
    }

    /// Build from settings; only `remote.url` is required here.
    pub fn from_settings(settings: &RemoteSettings) -> Result<Self> {
        if settings.url.is_empty() {
            return Err(Error::RemoteNotConfigured {
                key: ConfigKey::RemoteUrl,
            });
        }
        Self::new(settings.url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> reqwest::RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        debug!("=== Remote Request ===");
        debug!("{} {} (x-request-id {})", method, url, request_id);

        self.client
            .request(method, url.clone())
            .header("x-request-id", request_id)
    }

    async fn send(
        &self,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| Error::Transport {
            url: url.to_string(),
            source: e,
        })?;
        read_body(url, response).await
    }

    /// `POST {base}/api/repos`; returns the new repository id.
    pub async fn create_repository(&self, name: &str) -> Result<String> {
        let url = build_url(&self.base_url, &["api", "repos"])?;
        let request = self
            .request(reqwest::Method::POST, &url)
            .json(&CreateRepoRequest { name });

        let (status, body) = self.send(&url, request).await?;
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(Error::Protocol {
                operation: "create repo",
                status: status.as_u16(),
                body,
            });
        }

        let fields: serde_json::Map<String, serde_json::Value> = decode("create repo", &body)?;
        match fields.get("id") {
            Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            _ => Err(Error::Protocol {
                operation: "create repo (no repository id in response)",
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// `POST {base}/api/repos/{repo_id}/push`
    pub async fn push(&self, repo_id: &str, payload: &PushPayload) -> Result<()> {
        let url = build_url(&self.base_url, &["api", "repos", repo_id, "push"])?;
        debug!(
            "Pushing branch {} ({} commits, {} files, {} messages)",
            payload.branch,
            payload.commits.len(),
            payload.files.len(),
            payload.history.len()
        );

        let request = self.request(reqwest::Method::POST, &url).json(payload);
        let (status, body) = self.send(&url, request).await?;
        if status != StatusCode::OK {
            return Err(Error::Protocol {
                operation: "push",
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// `GET {base}/api/repos/{repo_id}/pull`
    pub async fn pull(&self, repo_id: &str) -> Result<PullPayload> {
        let url = build_url(&self.base_url, &["api", "repos", repo_id, "pull"])?;
        let request = self.request(reqwest::Method::GET, &url);

        let (status, body) = self.send(&url, request).await?;
        if status != StatusCode::OK {
            return Err(Error::Protocol {
                operation: "pull",
                status: status.as_u16(),
                body,
            });
        }
        decode("pull", &body)
    }
}
