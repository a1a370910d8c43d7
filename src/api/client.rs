use reqwest::{Client, StatusCode};
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::remote::{build_http_client, build_url, read_body};

use super::prompt::InterpreterRequest;
use super::types::{ChatRequest, ChatResponse};

/// Model used when none is given on the command line.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Turns a command plus workspace context into git-like output.
pub trait CommandInterpreter {
    async fn interpret(&self, request: &InterpreterRequest<'_>) -> Result<String>;
}

/// Interpreter backed by an OpenAI-compatible chat completion endpoint.
pub struct ChatInterpreter {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    session_id: String,
}

impl ChatInterpreter {
    pub fn new(endpoint: String, api_key: String, model: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            endpoint,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    /// Build from validated settings (`api.url` and `api.key` present).
    pub fn from_config(config: &Config, model: Option<String>) -> Result<Self> {
        config.validate()?;
        Self::new(config.api.url.clone(), config.api.key.clone(), model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CommandInterpreter for ChatInterpreter {
    async fn interpret(&self, request: &InterpreterRequest<'_>) -> Result<String> {
        // api.url is the full completion endpoint, used as-is.
        let url = build_url(&self.endpoint, &[])?;
        let messages = request.messages();
        let body = ChatRequest {
            model: &self.model,
            messages: &messages,
        };

        debug!("=== Interpreter Request ===");
        debug!("URL: {}", url);
        debug!("Command: {} ({} messages)", request.command_line(), messages.len());

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .header("x-request-id", Uuid::new_v4().to_string())
            .header("x-request-session-id", &self.session_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let (status, text) = read_body(&url, response).await?;
        if status != StatusCode::OK {
            error!("Interpreter request failed with status {}", status);
            return Err(Error::Protocol {
                operation: "interpreter request",
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| Error::Decode {
            context: "interpreter",
            source: e,
        })?;

        if let Some(err) = parsed.error {
            return Err(Error::Interpreter(err.message));
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Interpreter("no response from API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;
    use crate::workspace::Snapshot;
    use mockito::Matcher;
    use serde_json::json;

    fn request<'a>(files: &'a Snapshot, args: &'a [String]) -> InterpreterRequest<'a> {
        InterpreterRequest {
            label: "git status",
            args,
            branch: "main",
            files,
            history: &[],
        }
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = Config::default();
        config.set(ConfigKey::ApiUrl, "https://llm.example.com/v1/chat/completions");

        let err = ChatInterpreter::from_config(&config, None).err().unwrap();
        assert!(matches!(
            err,
            Error::ConfigIncomplete {
                key: ConfigKey::ApiKey
            }
        ));

        config.set(ConfigKey::ApiKey, "secret");
        let interpreter = ChatInterpreter::from_config(&config, None).unwrap();
        assert_eq!(interpreter.model(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_interpret_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({"model": "test-model"})))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"On branch main"}}]}"#)
            .create_async()
            .await;

        let interpreter = ChatInterpreter::new(
            format!("{}/v1/chat/completions", server.url()),
            "secret".to_string(),
            Some("test-model".to_string()),
        )
        .unwrap();

        let files = Snapshot::new();
        let output = interpreter.interpret(&request(&files, &[])).await.unwrap();

        assert_eq!(output, "On branch main");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_interpret_error_payloads() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/error")
            .with_status(200)
            .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/empty")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/denied")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let files = Snapshot::new();
        let call = |path: &str| {
            ChatInterpreter::new(
                format!("{}{}", server.url(), path),
                "secret".to_string(),
                None,
            )
            .unwrap()
        };

        let err = call("/error").interpret(&request(&files, &[])).await.unwrap_err();
        assert!(matches!(err, Error::Interpreter(ref m) if m == "quota exceeded"));

        let err = call("/empty").interpret(&request(&files, &[])).await.unwrap_err();
        assert!(matches!(err, Error::Interpreter(_)));

        let err = call("/denied").interpret(&request(&files, &[])).await.unwrap_err();
        assert!(matches!(err, Error::Protocol { status: 401, .. }));
    }
}
