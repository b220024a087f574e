//! Semantic phrase matching.
//!
//! Each sentence is compared against a catalog of canonical legal concepts.
//! A sentence whose best similarity reaches the threshold becomes a
//! `semantic_match` candidate carrying the winning phrase.

use std::sync::Arc;

use tracing::debug;

use clausewise_core::catalog::TARGET_PHRASES;
use clausewise_core::{CandidatePoint, Category, Sentence};

use crate::model::{SentenceEmbedder, cosine_sim};

/// A canonical concept and its embedding.
#[derive(Debug, Clone)]
pub struct PhraseCatalogEntry {
    pub phrase: String,
    pub embedding: Vec<f32>,
}

/// Embedded concept phrases, in tie-break order.
#[derive(Debug, Clone, Default)]
pub struct PhraseCatalog {
    entries: Vec<PhraseCatalogEntry>,
}

impl PhraseCatalog {
    /// Embed `phrases` in one batch.
    pub fn embed(embedder: &dyn SentenceEmbedder, phrases: &[&str]) -> anyhow::Result<Self> {
        let vectors = embedder.embed_batch(phrases)?;
        anyhow::ensure!(
            vectors.len() == phrases.len(),
            "embedder returned {} vectors for {} phrases",
            vectors.len(),
            phrases.len()
        );
        let entries = phrases
            .iter()
            .zip(vectors)
            .map(|(phrase, embedding)| PhraseCatalogEntry {
                phrase: phrase.to_string(),
                embedding,
            })
            .collect();
        Ok(Self { entries })
    }

    /// The built-in legal concept list.
    pub fn standard(embedder: &dyn SentenceEmbedder) -> anyhow::Result<Self> {
        Self::embed(embedder, TARGET_PHRASES)
    }

    pub fn entries(&self) -> &[PhraseCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-similarity entry. Ties go to the earlier entry.
    pub fn best_match(&self, embedding: &[f32]) -> Option<(&PhraseCatalogEntry, f32)> {
        let mut best: Option<(&PhraseCatalogEntry, f32)> = None;
        for entry in &self.entries {
            let score = cosine_sim(embedding, &entry.embedding);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((entry, score)),
            }
        }
        best
    }
}

pub struct SemanticMatcher {
    embedder: Arc<dyn SentenceEmbedder>,
    catalog: PhraseCatalog,
    threshold: f32,
}

impl SemanticMatcher {
    pub fn new(embedder: Arc<dyn SentenceEmbedder>, catalog: PhraseCatalog, threshold: f32) -> Self {
        Self {
            embedder,
            catalog,
            threshold,
        }
    }

    /// Embeds the standard concept list with `embedder`.
    pub fn standard(embedder: Arc<dyn SentenceEmbedder>, threshold: f32) -> anyhow::Result<Self> {
        let catalog = PhraseCatalog::standard(embedder.as_ref())?;
        Ok(Self::new(embedder, catalog, threshold))
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn find_matches(&self, sentences: &[Sentence]) -> anyhow::Result<Vec<CandidatePoint>> {
        let kept: Vec<&Sentence> = sentences.iter().filter(|s| !s.text.trim().is_empty()).collect();
        if kept.is_empty() || self.catalog.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = kept.iter().map(|s| s.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        anyhow::ensure!(
            vectors.len() == kept.len(),
            "embedder returned {} vectors for {} sentences",
            vectors.len(),
            kept.len()
        );

        let mut found = Vec::new();
        for (sentence, vector) in kept.iter().zip(&vectors) {
            let Some((entry, score)) = self.catalog.best_match(vector) else {
                continue;
            };
            if score >= self.threshold {
                found.push(
                    CandidatePoint::new(sentence.text.clone(), Category::SemanticMatch, score, sentence.start)
                        .with_concept(entry.phrase.clone()),
                );
            }
        }
        debug!(sentences = kept.len(), matches = found.len(), "semantic matching");
        Ok(found)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use clausewise_core::text::sentences;

    /// Maps known texts to fixed vectors; anything else gets `[0, 0, 1]`.
    pub(crate) struct LookupEmbedder(pub Vec<(&'static str, Vec<f32>)>);

    impl SentenceEmbedder for LookupEmbedder {
        fn model_id(&self) -> &str {
            "lookup"
        }

        fn dim(&self) -> usize {
            3
        }

        fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    self.0
                        .iter()
                        .find(|(k, _)| k == t)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_else(|| vec![0.0, 0.0, 1.0])
                })
                .collect())
        }
    }

    const INDEMNITY: &str = "Party A will protect Party B from any resulting claims.";
    const WEATHER: &str = "Tomorrow will be sunny with light winds from the west.";

    fn matcher() -> SemanticMatcher {
        let embedder = Arc::new(LookupEmbedder(vec![
            ("indemnify the other party", vec![1.0, 0.0, 0.0]),
            ("governing law", vec![0.0, 1.0, 0.0]),
            (INDEMNITY, vec![0.9, 0.1, 0.0]),
            (WEATHER, vec![0.0, 0.0, 1.0]),
        ]));
        let catalog =
            PhraseCatalog::embed(embedder.as_ref(), &["indemnify the other party", "governing law"]).unwrap();
        SemanticMatcher::new(embedder, catalog, 0.7)
    }

    #[test]
    fn paraphrase_matches_concept() {
        let found = matcher().find_matches(&sentences(INDEMNITY)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category(), Category::SemanticMatch);
        assert_eq!(found[0].matched_concept(), Some("indemnify the other party"));
        assert!(found[0].confidence() >= 0.7);
    }

    #[test]
    fn unrelated_text_does_not_match() {
        let found = matcher().find_matches(&sentences(WEATHER)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn score_equal_to_threshold_matches() {
        const BORDERLINE: &str = "The seller will hold the buyer harmless.";
        let sentence_vec = vec![0.6, 0.8, 0.0];
        let phrase_vec = vec![1.0, 0.0, 0.0];
        let threshold = cosine_sim(&sentence_vec, &phrase_vec);
        let embedder = Arc::new(LookupEmbedder(vec![
            ("indemnify the other party", phrase_vec),
            (BORDERLINE, sentence_vec),
        ]));
        let catalog = PhraseCatalog::embed(embedder.as_ref(), &["indemnify the other party"]).unwrap();
        let found = SemanticMatcher::new(embedder, catalog, threshold)
            .find_matches(&sentences(BORDERLINE))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confidence(), threshold);
    }

    #[test]
    fn first_max_wins_on_tie() {
        let embedder = LookupEmbedder(vec![("a", vec![1.0, 0.0, 0.0]), ("b", vec![1.0, 0.0, 0.0])]);
        let catalog = PhraseCatalog::embed(&embedder, &["a", "b"]).unwrap();
        let (entry, score) = catalog.best_match(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(entry.phrase, "a");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(matcher().find_matches(&[]).unwrap().is_empty());
    }

    #[test]
    fn standard_catalog_covers_all_phrases() {
        let embedder = LookupEmbedder(Vec::new());
        let catalog = PhraseCatalog::standard(&embedder).unwrap();
        assert_eq!(catalog.len(), TARGET_PHRASES.len());
    }
}
