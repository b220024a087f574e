use thiserror::Error;

/// Failures inside the analysis pipeline.
///
/// None of these escape the orchestrator: each one is logged and answered by
/// moving on to the next provider or skipping the affected extractor.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("model {model} failed to load: {reason}")]
    ModelLoadFailure { model: String, reason: String },

    #[error("provider {provider} timed out after {secs:.1}s")]
    Timeout { provider: String, secs: f64 },

    #[error("provider {provider} returned an unusable response: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl AnalysisError {
    pub fn unavailable(provider: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(provider: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }
}
