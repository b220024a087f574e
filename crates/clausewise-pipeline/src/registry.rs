//! Ordered provider registry.

use std::sync::Arc;

use tracing::{info, warn};

use clausewise_core::AnalyzerConfig;
use clausewise_remote::RemoteBackend;

use crate::fallback::RuleBasedFallback;
use crate::local::{LocalHybrid, LocalModels};
use crate::provider::{AnalysisProvider, ProviderKind};
use crate::remote::RemoteLlmProvider;

const REMOTE_PRIORITY: u32 = 10;
const LOCAL_PRIORITY: u32 = 100;
const FALLBACK_PRIORITY: u32 = 1000;

/// Providers in ascending priority. Construction order breaks ties.
#[derive(Clone, Default)]
pub struct Registry {
    providers: Vec<Arc<dyn AnalysisProvider>>,
}

impl Registry {
    pub fn new(mut providers: Vec<Arc<dyn AnalysisProvider>>) -> Self {
        providers.sort_by_key(|p| p.descriptor().priority);
        Self { providers }
    }

    /// Remote backends with a usable key (Gemini, OpenAI, Anthropic, in that
    /// order), then the local hybrid provider, then the rule tier.
    pub fn from_config(config: &AnalyzerConfig, models: Arc<LocalModels>) -> Self {
        let mut providers: Vec<Arc<dyn AnalysisProvider>> = Vec::new();

        for (i, backend) in RemoteBackend::ALL.into_iter().enumerate() {
            let credentials = match backend {
                RemoteBackend::Gemini => &config.gemini,
                RemoteBackend::OpenAi => &config.openai,
                RemoteBackend::Anthropic => &config.anthropic,
            };
            if credentials.usable_key().is_none() {
                continue;
            }
            match RemoteLlmProvider::new(backend, credentials, config.provider_timeout, REMOTE_PRIORITY + i as u32) {
                Ok(provider) => {
                    info!(provider = %provider.descriptor().name, "registered remote provider");
                    providers.push(Arc::new(provider));
                }
                Err(e) => warn!(backend = %backend, error = %e, "remote provider not registered"),
            }
        }

        providers.push(Arc::new(LocalHybrid::new(models, LOCAL_PRIORITY)));
        providers.push(Arc::new(RuleBasedFallback::new(FALLBACK_PRIORITY)));
        Self::new(providers)
    }

    pub fn providers(&self) -> &[Arc<dyn AnalysisProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registry order with every provider of `preferred` kind moved to the
    /// front. Relative order is otherwise unchanged.
    pub fn ordered_for(&self, preferred: ProviderKind) -> Vec<Arc<dyn AnalysisProvider>> {
        let mut ordered = self.providers.clone();
        ordered.sort_by_key(|p| p.kind() != preferred);
        ordered
    }
}
