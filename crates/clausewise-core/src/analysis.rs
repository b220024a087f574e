//! Per-request analysis output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which provider path the caller prefers to try first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Remote LLM providers first.
    #[default]
    Remote,
    /// Local embeddings + rules first.
    Local,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "llm" | "gemini" => Ok(Self::Remote),
            "local" | "bart" => Ok(Self::Local),
            other => Err(format!("unknown analysis mode: {other}")),
        }
    }
}

/// How a result was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub processing_method: String,
    pub provider_or_model: String,
    pub success: bool,
    pub mode: Mode,
    pub summary_provider: String,
    pub key_points_provider: String,
    /// Candidates fed to the ranker before dedup and truncation.
    pub candidates_considered: usize,
    pub elapsed_ms: u64,
    pub analyzed_at: DateTime<Utc>,
}

/// Summary plus ranked key points for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("remote".parse::<Mode>().unwrap(), Mode::Remote);
        assert_eq!("Gemini".parse::<Mode>().unwrap(), Mode::Remote);
        assert_eq!("bart".parse::<Mode>().unwrap(), Mode::Local);
        assert_eq!(" LOCAL ".parse::<Mode>().unwrap(), Mode::Local);
        assert!("quantum".parse::<Mode>().is_err());
    }

    #[test]
    fn result_json_shape() {
        let result = AnalysisResult {
            summary: "s".into(),
            key_points: vec!["a".into()],
            metadata: AnalysisMetadata {
                processing_method: "Rule-based fallback".into(),
                provider_or_model: "rule-based".into(),
                success: false,
                mode: Mode::Local,
                summary_provider: "rule-based".into(),
                key_points_provider: "rule-based".into(),
                candidates_considered: 1,
                elapsed_ms: 3,
                analyzed_at: Utc::now(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["mode"], "local");
        assert_eq!(json["metadata"]["success"], false);
        assert_eq!(json["key_points"][0], "a");
    }
}
