//! Local models and the LocalHybrid provider.
//!
//! Models load once per process. A model that fails to load is logged as a
//! [`AnalysisError::ModelLoadFailure`] and the extractors that need it are
//! skipped for the rest of the process lifetime.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use clausewise_ai::clauses::{extract_conditions, extract_obligations};
use clausewise_ai::patterns::{detect_critical_points, order_critical_points};
use clausewise_ai::summarize::{DEFAULT_SUMMARY_SENTENCES, centroid_summary};
use clausewise_ai::{
    CachedEmbedder, EntityModel, EntityRecognizer, Parser, PatternNer, SemanticMatcher, SentenceEmbedder,
};
use clausewise_core::catalog::PatternCatalog;
use clausewise_core::text::sentences;
use clausewise_core::{AnalysisError, AnalyzerConfig, CandidatePoint};

use crate::provider::{AnalysisProvider, Capabilities, ProviderDescriptor, ProviderKind};

/// Process-wide local model set.
pub struct LocalModels {
    parser: Parser,
    embedder: Option<Arc<dyn SentenceEmbedder>>,
    semantic: Option<SemanticMatcher>,
    entities: EntityRecognizer,
}

impl LocalModels {
    /// Assemble from already-constructed models. The embedder is wrapped in
    /// the content-hash memo and used to embed the phrase catalog.
    pub fn new(
        embedder: Option<Arc<dyn SentenceEmbedder>>,
        entity_model: Arc<dyn EntityModel>,
        config: &AnalyzerConfig,
    ) -> Self {
        let embedder: Option<Arc<dyn SentenceEmbedder>> = embedder.map(|inner| {
            Arc::new(CachedEmbedder::new(inner, config.embed_cache_capacity)) as Arc<dyn SentenceEmbedder>
        });

        let semantic = embedder.as_ref().and_then(|e| {
            match SemanticMatcher::standard(e.clone(), config.semantic_threshold) {
                Ok(matcher) => Some(matcher),
                Err(err) => {
                    let err = AnalysisError::ModelLoadFailure {
                        model: e.model_id().to_string(),
                        reason: format!("embedding phrase catalog: {err}"),
                    };
                    warn!(error = %err, "semantic matching disabled");
                    None
                }
            }
        });

        Self {
            parser: Parser::new(),
            embedder,
            semantic,
            entities: EntityRecognizer::new(entity_model),
        }
    }

    /// Load the models named in `config`. Never fails: missing models leave
    /// their extractors disabled, and NER falls back to [`PatternNer`].
    pub fn load(config: &AnalyzerConfig) -> Self {
        let embedder = load_embedder(config);
        let entity_model = load_entity_model(config);
        let models = Self::new(embedder, entity_model, config);
        info!(
            embedder = models.embedder.as_ref().map(|e| e.model_id()).unwrap_or("none"),
            ner = models.entities.model_id(),
            semantic = models.semantic.is_some(),
            "local models ready"
        );
        models
    }

    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    /// Identifier reported in result metadata.
    pub fn model_id(&self) -> String {
        match &self.embedder {
            Some(e) => format!("{}+{}", e.model_id(), self.entities.model_id()),
            None => format!("rules+{}", self.entities.model_id()),
        }
    }

    /// Run every available local extractor. Candidates are unranked.
    pub fn extract(&self, text: &str) -> Vec<CandidatePoint> {
        let parsed = self.parser.parse(text);

        let obligations = extract_obligations(&parsed);
        let conditions = extract_conditions(&parsed);
        debug!(obligations = obligations.len(), conditions = conditions.len(), "clause rules");

        let mut candidates = obligations;
        candidates.extend(conditions);

        if let Some(matcher) = &self.semantic {
            let sents: Vec<_> = parsed.iter().map(|p| p.sentence.clone()).collect();
            match matcher.find_matches(&sents) {
                Ok(found) => candidates.extend(found),
                Err(e) => warn!(error = %e, "semantic matching failed, skipping"),
            }
        }

        let mut critical = detect_critical_points(text, PatternCatalog::standard());
        order_critical_points(&mut critical);
        debug!(count = critical.len(), "critical points");
        candidates.extend(critical);

        match self.entities.extract(text) {
            Ok(found) => {
                debug!(count = found.len(), "entities");
                candidates.extend(found);
            }
            Err(e) => warn!(error = %e, "entity recognition failed, skipping"),
        }

        candidates
    }

    /// Extractive summary; needs the embedding model.
    pub fn summarize(&self, text: &str) -> anyhow::Result<String> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no embedding model loaded"))?;
        centroid_summary(embedder.as_ref(), &sentences(text), DEFAULT_SUMMARY_SENTENCES)
    }
}

#[cfg(feature = "onnx")]
fn load_embedder(config: &AnalyzerConfig) -> Option<Arc<dyn SentenceEmbedder>> {
    let dir = config.embed_model_dir.as_ref()?;
    match clausewise_ai::Embedder::load(dir) {
        Ok(e) => Some(Arc::new(e)),
        Err(err) => {
            let err = AnalysisError::ModelLoadFailure {
                model: dir.display().to_string(),
                reason: err.to_string(),
            };
            warn!(error = %err, "embedding model unavailable");
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_embedder(config: &AnalyzerConfig) -> Option<Arc<dyn SentenceEmbedder>> {
    if let Some(dir) = &config.embed_model_dir {
        let err = AnalysisError::ModelLoadFailure {
            model: dir.display().to_string(),
            reason: "built without the `onnx` feature".into(),
        };
        warn!(error = %err, "embedding model unavailable");
    }
    None
}

#[cfg(feature = "onnx")]
fn load_entity_model(config: &AnalyzerConfig) -> Arc<dyn EntityModel> {
    if let Some(dir) = &config.ner_model_dir {
        match clausewise_ai::OnnxNer::load(dir) {
            Ok(ner) => return Arc::new(ner),
            Err(err) => {
                let err = AnalysisError::ModelLoadFailure {
                    model: dir.display().to_string(),
                    reason: err.to_string(),
                };
                warn!(error = %err, "NER model unavailable, using pattern NER");
            }
        }
    }
    Arc::new(PatternNer::new())
}

#[cfg(not(feature = "onnx"))]
fn load_entity_model(config: &AnalyzerConfig) -> Arc<dyn EntityModel> {
    if let Some(dir) = &config.ner_model_dir {
        let err = AnalysisError::ModelLoadFailure {
            model: dir.display().to_string(),
            reason: "built without the `onnx` feature".into(),
        };
        warn!(error = %err, "NER model unavailable, using pattern NER");
    }
    Arc::new(PatternNer::new())
}

/// Local models plus rules, run off the async executor.
pub struct LocalHybrid {
    models: Arc<LocalModels>,
    descriptor: ProviderDescriptor,
}

impl LocalHybrid {
    pub fn new(models: Arc<LocalModels>, priority: u32) -> Self {
        let descriptor = ProviderDescriptor {
            name: format!("local:{}", models.model_id()),
            priority,
            capability: Capabilities {
                summarize: models.has_embedder(),
                extract: true,
            },
        };
        Self { models, descriptor }
    }
}

#[async_trait]
impl AnalysisProvider for LocalHybrid {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::LocalHybrid
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        let name = self.descriptor.name.clone();
        if !self.descriptor.capability.summarize {
            return Err(AnalysisError::unavailable(name, "no local summarization model"));
        }
        let models = self.models.clone();
        let text = text.to_string();
        let summary = tokio::task::spawn_blocking(move || models.summarize(&text))
            .await
            .map_err(|e| AnalysisError::Other(format!("local summarize task: {e}")))?
            .map_err(|e| AnalysisError::unavailable(&name, e))?;
        if summary.trim().is_empty() {
            return Err(AnalysisError::invalid(name, "empty summary"));
        }
        Ok(summary)
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidatePoint>, AnalysisError> {
        let models = self.models.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || models.extract(&text))
            .await
            .map_err(|e| AnalysisError::Other(format!("local extract task: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::Category;

    /// Maps sentences mentioning "protect" onto the indemnity concept.
    struct KeywordEmbedder;

    impl SentenceEmbedder for KeywordEmbedder {
        fn model_id(&self) -> &str {
            "keyword"
        }

        fn dim(&self) -> usize {
            2
        }

        fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("protect") || *t == "indemnify the other party" {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    const LEASE: &str = "Tenant shall pay rent on the first of each month. \
        If the tenant defaults, the landlord may terminate the lease. \
        Rent of $1,500.00 is due by March 1, 2025. \
        Party A will protect Party B from any resulting claims.";

    fn models(embedder: bool) -> LocalModels {
        let embedder: Option<Arc<dyn SentenceEmbedder>> = embedder.then(|| Arc::new(KeywordEmbedder) as Arc<dyn SentenceEmbedder>);
        LocalModels::new(embedder, Arc::new(PatternNer::new()), &AnalyzerConfig::default())
    }

    #[test]
    fn extract_runs_every_extractor() {
        let found = models(true).extract(LEASE);
        let has = |c: Category| found.iter().any(|p| p.category() == c);
        assert!(has(Category::Obligation));
        assert!(has(Category::Condition));
        assert!(has(Category::SemanticMatch));
        assert!(has(Category::Amount));
        assert!(has(Category::Deadline));
        assert!(has(Category::Entity));
    }

    #[test]
    fn semantic_skipped_without_embedder() {
        let found = models(false).extract(LEASE);
        assert!(found.iter().all(|p| p.category() != Category::SemanticMatch));
        assert!(found.iter().any(|p| p.category() == Category::Obligation));
    }

    #[test]
    fn model_id_lists_components() {
        assert_eq!(models(true).model_id(), "keyword+pattern-ner");
        assert_eq!(models(false).model_id(), "rules+pattern-ner");
    }

    #[tokio::test]
    async fn summarize_without_embedder_is_unavailable() {
        let provider = LocalHybrid::new(Arc::new(models(false)), 1);
        assert!(!provider.descriptor().capability.summarize);
        let err = provider.summarize(LEASE).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn summarize_with_embedder() {
        let provider = LocalHybrid::new(Arc::new(models(true)), 1);
        let summary = provider.summarize(LEASE).await.unwrap();
        assert!(summary.starts_with("Tenant shall pay rent"));
    }

    #[tokio::test]
    async fn extract_runs_off_executor() {
        let provider = LocalHybrid::new(Arc::new(models(false)), 1);
        let found = provider.extract(LEASE).await.unwrap();
        assert!(!found.is_empty());
    }

    #[test]
    fn load_without_model_dirs_uses_pattern_ner() {
        let models = LocalModels::load(&AnalyzerConfig::default());
        assert!(!models.has_embedder());
        assert_eq!(models.model_id(), "rules+pattern-ner");
    }
}
