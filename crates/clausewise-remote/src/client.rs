//! HTTP client for one remote LLM backend.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use clausewise_core::RemoteCredentials;

use crate::backend::RemoteBackend;
use crate::prompt::{self, POINTS_MAX_TOKENS, SUMMARY_MAX_TOKENS};

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} response contained no text")]
    EmptyResponse(RemoteBackend),
    #[error("no API key configured for {0}")]
    MissingCredentials(RemoteBackend),
}

/// Server error bodies are echoed into logs; keep them short.
const MAX_ERROR_BODY: usize = 500;

pub struct RemoteClient {
    client: reqwest::Client,
    backend: RemoteBackend,
    api_key: String,
    model: String,
    endpoint: String,
}

impl RemoteClient {
    /// Build a client from configured credentials. Fails when no usable key
    /// is present.
    pub fn new(
        backend: RemoteBackend,
        credentials: &RemoteCredentials,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let api_key = credentials
            .usable_key()
            .ok_or(RemoteError::MissingCredentials(backend))?
            .to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            backend,
            api_key,
            model: credentials
                .model
                .clone()
                .unwrap_or_else(|| backend.default_model().to_string()),
            endpoint: credentials
                .endpoint
                .clone()
                .unwrap_or_else(|| backend.default_endpoint().to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn backend(&self) -> RemoteBackend {
        self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-turn prompt and return the generated text.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, RemoteError> {
        let url = self.backend.url(&self.endpoint, &self.model);
        let body = self.backend.request_body(&self.model, prompt, max_tokens);

        let mut request = self.client.post(&url).json(&body);
        for (name, value) in self.backend.auth_headers(&self.api_key) {
            request = request.header(name, value);
        }

        debug!(backend = %self.backend, model = %self.model, "sending prompt");
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body: String = resp.text().await.unwrap_or_default().chars().take(MAX_ERROR_BODY).collect();
            return Err(RemoteError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        self.backend
            .response_text(&text)?
            .ok_or(RemoteError::EmptyResponse(self.backend))
    }

    pub async fn summarize(&self, text: &str) -> Result<String, RemoteError> {
        let summary = self.complete(&prompt::summary_prompt(text), SUMMARY_MAX_TOKENS).await?;
        info!(backend = %self.backend, chars = summary.len(), "remote summary");
        Ok(summary)
    }

    /// Ask for a point list and parse it. An answer with no usable lines is
    /// an [`RemoteError::EmptyResponse`].
    pub async fn extract_points(&self, text: &str) -> Result<Vec<String>, RemoteError> {
        let raw = self.complete(&prompt::points_prompt(text), POINTS_MAX_TOKENS).await?;
        let points = prompt::parse_points(&raw);
        if points.is_empty() {
            return Err(RemoteError::EmptyResponse(self.backend));
        }
        info!(backend = %self.backend, count = points.len(), "remote key points");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected() {
        let err = RemoteClient::new(
            RemoteBackend::OpenAi,
            &RemoteCredentials::default(),
            Duration::from_secs(1),
        )
        .err()
        .unwrap();
        assert!(matches!(err, RemoteError::MissingCredentials(RemoteBackend::OpenAi)));
    }

    #[test]
    fn blank_key_is_rejected() {
        let creds = RemoteCredentials::with_key("   ");
        assert!(RemoteClient::new(RemoteBackend::Gemini, &creds, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn defaults_and_overrides() {
        let client = RemoteClient::new(
            RemoteBackend::Anthropic,
            &RemoteCredentials::with_key("k"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.model(), "claude-3-sonnet-20240229");
        assert_eq!(client.endpoint, "https://api.anthropic.com");

        let creds = RemoteCredentials {
            api_key: Some("k".into()),
            model: Some("gpt-4o-mini".into()),
            endpoint: Some("http://localhost:8080/".into()),
        };
        let client = RemoteClient::new(RemoteBackend::OpenAi, &creds, Duration::from_secs(1)).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.endpoint, "http://localhost:8080");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let creds = RemoteCredentials {
            api_key: Some("k".into()),
            model: None,
            endpoint: Some("http://127.0.0.1:9".into()),
        };
        let client = RemoteClient::new(RemoteBackend::OpenAi, &creds, Duration::from_secs(2)).unwrap();
        let err = client.summarize("Some contract text").await.unwrap_err();
        assert!(matches!(err, RemoteError::Http(_)), "{err}");
    }
}
