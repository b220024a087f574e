//! Per-backend wire formats.

use serde::Deserialize;
use serde_json::{Value, json};

/// A hosted LLM API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteBackend {
    Gemini,
    OpenAi,
    Anthropic,
}

const ANTHROPIC_VERSION: &str = "2023-06-01";

impl RemoteBackend {
    /// Registration order when several keys are configured.
    pub const ALL: [RemoteBackend; 3] = [Self::Gemini, Self::OpenAi, Self::Anthropic];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-3-sonnet-20240229",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }

    /// Full request URL. Gemini carries the model in the path.
    pub fn url(&self, endpoint: &str, model: &str) -> String {
        let base = endpoint.trim_end_matches('/');
        match self {
            Self::Gemini => format!("{base}/v1beta/models/{model}:generateContent"),
            Self::OpenAi => format!("{base}/v1/chat/completions"),
            Self::Anthropic => format!("{base}/v1/messages"),
        }
    }

    /// Authentication headers for `api_key`.
    pub fn auth_headers(&self, api_key: &str) -> Vec<(&'static str, String)> {
        match self {
            Self::Gemini => vec![("x-goog-api-key", api_key.to_string())],
            Self::OpenAi => vec![("authorization", format!("Bearer {api_key}"))],
            Self::Anthropic => vec![
                ("x-api-key", api_key.to_string()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
        }
    }

    /// JSON body for a single-turn prompt.
    pub fn request_body(&self, model: &str, prompt: &str, max_tokens: u32) -> Value {
        match self {
            Self::Gemini => json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                "generationConfig": { "maxOutputTokens": max_tokens },
            }),
            Self::OpenAi => json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "max_tokens": max_tokens,
            }),
            Self::Anthropic => json!({
                "model": model,
                "max_tokens": max_tokens,
                "messages": [{ "role": "user", "content": prompt }],
            }),
        }
    }

    /// Generated text from a response body, or `None` when the response
    /// carries no text.
    pub fn response_text(&self, body: &str) -> Result<Option<String>, serde_json::Error> {
        let text = match self {
            Self::Gemini => {
                let resp: GeminiResponse = serde_json::from_str(body)?;
                resp.candidates.into_iter().next().map(|c| {
                    c.content
                        .parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<String>()
                })
            }
            Self::OpenAi => {
                let resp: OpenAiResponse = serde_json::from_str(body)?;
                resp.choices.into_iter().next().and_then(|c| c.message.content)
            }
            Self::Anthropic => {
                let resp: AnthropicResponse = serde_json::from_str(body)?;
                let text: String = resp
                    .content
                    .into_iter()
                    .filter(|b| b.kind == "text")
                    .filter_map(|b| b.text)
                    .collect();
                Some(text)
            }
        };
        Ok(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
    }
}

impl std::fmt::Display for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}
