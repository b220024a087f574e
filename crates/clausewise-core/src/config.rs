//! Process-wide analyzer configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;
pub const DEFAULT_MAX_KEY_POINTS: usize = 10;
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.7;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EMBED_CACHE_CAPACITY: usize = 1000;

/// Credentials and model selection for one remote backend.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RemoteCredentials {
    pub api_key: Option<String>,
    /// Overrides the backend's default model identifier.
    pub model: Option<String>,
    /// Overrides the backend's default API base URL.
    pub endpoint: Option<String>,
}

impl RemoteCredentials {
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// A key is usable only when present and non-blank.
    pub fn usable_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Inputs shorter than this (after trimming, in characters) short-circuit.
    pub min_text_chars: usize,
    pub max_key_points: usize,
    pub semantic_threshold: f32,
    /// Deadline applied to every provider call.
    #[serde(with = "duration_secs")]
    pub provider_timeout: Duration,
    pub embed_cache_capacity: usize,
    pub gemini: RemoteCredentials,
    pub openai: RemoteCredentials,
    pub anthropic: RemoteCredentials,
    /// Directory with `model.onnx` + `tokenizer.json` for sentence embeddings.
    pub embed_model_dir: Option<PathBuf>,
    /// Directory with `model.onnx` + `tokenizer.json` + `config.json` for NER.
    pub ner_model_dir: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            max_key_points: DEFAULT_MAX_KEY_POINTS,
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            embed_cache_capacity: DEFAULT_EMBED_CACHE_CAPACITY,
            gemini: RemoteCredentials::default(),
            openai: RemoteCredentials::default(),
            anthropic: RemoteCredentials::default(),
            embed_model_dir: None,
            ner_model_dir: None,
        }
    }
}

impl AnalyzerConfig {
    /// True when the trimmed input is below the analysis threshold.
    pub fn is_too_short(&self, text: &str) -> bool {
        text.trim().chars().count() < self.min_text_chars
    }

    /// True when any remote backend has a usable key.
    pub fn has_remote_credentials(&self) -> bool {
        [&self.gemini, &self.openai, &self.anthropic]
            .iter()
            .any(|c| c.usable_key().is_some())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("timeout must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalyzerConfig::default();
        assert_eq!(c.min_text_chars, 50);
        assert_eq!(c.max_key_points, 10);
        assert!((c.semantic_threshold - 0.7).abs() < f32::EPSILON);
        assert!(!c.has_remote_credentials());
    }

    #[test]
    fn too_short_counts_trimmed_chars() {
        let c = AnalyzerConfig::default();
        assert!(c.is_too_short("   short text   "));
        assert!(c.is_too_short(&format!("  {}  ", "x".repeat(49))));
        assert!(!c.is_too_short(&"x".repeat(50)));
    }

    #[test]
    fn blank_key_is_not_usable() {
        let mut c = AnalyzerConfig::default();
        c.openai = RemoteCredentials::with_key("   ");
        assert!(!c.has_remote_credentials());
        c.anthropic = RemoteCredentials::with_key("sk-test");
        assert!(c.has_remote_credentials());
    }

    #[test]
    fn debug_redacts_keys() {
        let creds = RemoteCredentials::with_key("super-secret");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn timeout_roundtrips_as_seconds() {
        let c = AnalyzerConfig {
            provider_timeout: Duration::from_millis(2500),
            ..Default::default()
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["provider_timeout"], 2.5);
        let back: AnalyzerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.provider_timeout, Duration::from_millis(2500));
    }
}
