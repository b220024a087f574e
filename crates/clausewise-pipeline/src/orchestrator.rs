//! Provider fallback orchestration.
//!
//! Every public operation here is total: provider failures and timeouts are
//! logged and answered by the next provider, and when the registry runs dry
//! a deterministic rule-based result is returned instead.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use clausewise_core::catalog::{TOO_SHORT_KEY_POINT, TOO_SHORT_SUMMARY};
use clausewise_core::{
    AnalysisError, AnalysisMetadata, AnalysisResult, AnalyzerConfig, CandidatePoint, Category, Mode,
    enhance_summary, rank_candidates,
};

use crate::fallback::{self, RuleBasedFallback};
use crate::local::LocalModels;
use crate::provider::{AnalysisProvider, ProviderKind};
use crate::registry::Registry;

/// A value and the provider that produced it.
#[derive(Debug, Clone)]
struct Outcome<T> {
    value: T,
    provider: String,
    kind: ProviderKind,
}

impl<T> Outcome<T> {
    fn last_resort(value: T) -> Self {
        Self {
            value,
            provider: RuleBasedFallback::NAME.to_string(),
            kind: ProviderKind::RuleBasedFallback,
        }
    }
}

pub struct Orchestrator {
    registry: Registry,
    config: AnalyzerConfig,
}

impl Orchestrator {
    pub fn new(registry: Registry, config: AnalyzerConfig) -> Self {
        Self { registry, config }
    }

    /// Load local models and register every configured provider.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        let models = Arc::new(LocalModels::load(&config));
        let registry = Registry::from_config(&config, models);
        Self::new(registry, config)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Summary from the first provider that succeeds.
    pub async fn summarize(&self, text: &str, mode: Mode) -> String {
        if self.config.is_too_short(text) {
            return TOO_SHORT_SUMMARY.to_string();
        }
        self.summary_outcome(text, mode).await.value
    }

    /// Ranked key-point candidates from the first provider that succeeds.
    pub async fn extract_key_points(&self, text: &str, mode: Mode) -> Vec<CandidatePoint> {
        if self.config.is_too_short(text) {
            return vec![too_short_point()];
        }
        let outcome = self.points_outcome(text, mode).await;
        rank_candidates(outcome.value, self.config.max_key_points)
    }

    /// Full analysis: enhanced summary, rendered key points, and metadata.
    pub async fn analyze(&self, text: &str, mode: Mode) -> AnalysisResult {
        self.analyze_detailed(text, mode).await.0
    }

    /// [`Orchestrator::analyze`] plus the ranked candidates behind the
    /// rendered key points.
    pub async fn analyze_detailed(&self, text: &str, mode: Mode) -> (AnalysisResult, Vec<CandidatePoint>) {
        let started = Instant::now();

        if self.config.is_too_short(text) {
            info!(chars = text.trim().chars().count(), "input too short, skipping analysis");
            let result = AnalysisResult {
                summary: TOO_SHORT_SUMMARY.to_string(),
                key_points: vec![TOO_SHORT_KEY_POINT.to_string()],
                metadata: AnalysisMetadata {
                    processing_method: "Input too short".to_string(),
                    provider_or_model: "none".to_string(),
                    success: false,
                    mode,
                    summary_provider: "none".to_string(),
                    key_points_provider: "none".to_string(),
                    candidates_considered: 0,
                    elapsed_ms: elapsed_ms(started),
                    analyzed_at: Utc::now(),
                },
            };
            return (result, vec![too_short_point()]);
        }

        let summary = self.summary_outcome(text, mode).await;
        let points = self.points_outcome(text, mode).await;
        let considered = points.value.len();
        let ranked = rank_candidates(points.value, self.config.max_key_points);

        let success =
            summary.kind != ProviderKind::RuleBasedFallback && points.kind != ProviderKind::RuleBasedFallback;
        let (processing_method, provider_or_model) = if summary.provider == points.provider {
            (summary.kind.method_label().to_string(), summary.provider.clone())
        } else {
            (
                format!("{} / {}", summary.kind.method_label(), points.kind.method_label()),
                format!("{} / {}", summary.provider, points.provider),
            )
        };

        let result = AnalysisResult {
            summary: enhance_summary(&summary.value),
            key_points: ranked.iter().map(CandidatePoint::render).collect(),
            metadata: AnalysisMetadata {
                processing_method,
                provider_or_model,
                success,
                mode,
                summary_provider: summary.provider,
                key_points_provider: points.provider,
                candidates_considered: considered,
                elapsed_ms: elapsed_ms(started),
                analyzed_at: Utc::now(),
            },
        };
        info!(
            method = %result.metadata.processing_method,
            key_points = result.key_points.len(),
            elapsed_ms = result.metadata.elapsed_ms,
            "analysis complete"
        );
        (result, ranked)
    }

    async fn summary_outcome(&self, text: &str, mode: Mode) -> Outcome<String> {
        for provider in self.registry.ordered_for(ProviderKind::preferred_for(mode)) {
            if !provider.descriptor().capability.summarize {
                continue;
            }
            if let Some(outcome) = self.attempt(provider.as_ref(), "summarize", provider.summarize(text)).await {
                return outcome;
            }
        }
        warn!("all providers failed to summarize, using document preview");
        Outcome::last_resort(fallback::preview_summary(text))
    }

    async fn points_outcome(&self, text: &str, mode: Mode) -> Outcome<Vec<CandidatePoint>> {
        for provider in self.registry.ordered_for(ProviderKind::preferred_for(mode)) {
            if !provider.descriptor().capability.extract {
                continue;
            }
            if let Some(outcome) = self.attempt(provider.as_ref(), "extract", provider.extract(text)).await {
                return outcome;
            }
        }
        warn!("all providers failed to extract key points, using generic reminders");
        Outcome::last_resort(fallback::reminder_points())
    }

    /// Run one provider call under the configured deadline.
    async fn attempt<T>(
        &self,
        provider: &dyn AnalysisProvider,
        operation: &str,
        call: impl Future<Output = Result<T, AnalysisError>>,
    ) -> Option<Outcome<T>> {
        let name = &provider.descriptor().name;
        let deadline = self.config.provider_timeout;
        let result = match tokio::time::timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout {
                provider: name.clone(),
                secs: deadline.as_secs_f64(),
            }),
        };
        match result {
            Ok(value) => {
                info!(provider = %name, operation, "provider succeeded");
                Some(Outcome {
                    value,
                    provider: name.clone(),
                    kind: provider.kind(),
                })
            }
            Err(e) => {
                warn!(provider = %name, operation, error = %e, "provider failed, trying next");
                None
            }
        }
    }
}

fn too_short_point() -> CandidatePoint {
    CandidatePoint::new(TOO_SHORT_KEY_POINT, Category::Error, 0.0, 0)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

static SHARED: OnceLock<Orchestrator> = OnceLock::new();

/// The process-wide orchestrator, built on first use. Models load once;
/// later calls return the same instance and ignore `config`.
///
/// The first call loads models on the calling thread. From async code use
/// [`load_shared`] instead.
pub fn shared(config: &AnalyzerConfig) -> &'static Orchestrator {
    SHARED.get_or_init(|| Orchestrator::from_config(config.clone()))
}

/// [`shared`] for async callers: the first load runs on the blocking pool.
pub async fn load_shared(config: &AnalyzerConfig) -> &'static Orchestrator {
    if let Some(orchestrator) = SHARED.get() {
        return orchestrator;
    }
    let owned = config.clone();
    match tokio::task::spawn_blocking(move || shared(&owned)).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            warn!(error = %e, "model loading task failed, loading inline");
            shared(config)
        }
    }
}
