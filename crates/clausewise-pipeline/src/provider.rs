//! The provider abstraction the orchestrator iterates over.

use async_trait::async_trait;

use clausewise_core::{AnalysisError, CandidatePoint, Mode};

/// The three families of analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    RemoteLlm,
    LocalHybrid,
    RuleBasedFallback,
}

impl ProviderKind {
    /// The kind a caller's [`Mode`] asks to try first.
    pub fn preferred_for(mode: Mode) -> Self {
        match mode {
            Mode::Remote => Self::RemoteLlm,
            Mode::Local => Self::LocalHybrid,
        }
    }

    /// Label used for `processing_method` in result metadata.
    pub fn method_label(&self) -> &'static str {
        match self {
            Self::RemoteLlm => "Remote LLM",
            Self::LocalHybrid => "Local models + rules",
            Self::RuleBasedFallback => "Rule-based fallback",
        }
    }
}

/// Which operations a provider supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub summarize: bool,
    pub extract: bool,
}

impl Capabilities {
    pub const BOTH: Self = Self {
        summarize: true,
        extract: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDescriptor {
    /// Provider or model name reported in metadata.
    pub name: String,
    /// Lower runs earlier.
    pub priority: u32,
    pub capability: Capabilities,
}

/// A backend able to summarise a document and/or extract key points.
///
/// Errors are recovered by the orchestrator, which moves on to the next
/// provider.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    fn kind(&self) -> ProviderKind;

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError>;

    async fn extract(&self, text: &str) -> Result<Vec<CandidatePoint>, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_maps_to_kind() {
        assert_eq!(ProviderKind::preferred_for(Mode::Remote), ProviderKind::RemoteLlm);
        assert_eq!(ProviderKind::preferred_for(Mode::Local), ProviderKind::LocalHybrid);
    }
}
