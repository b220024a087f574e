//! Entity-based key points: dates, money, percentages and times.

use std::sync::Arc;

use clausewise_core::point::MEDIUM_CONFIDENCE;
use clausewise_core::text::sentences;
use clausewise_core::{CandidatePoint, Category};

use crate::model::EntityModel;

/// Entity labels worth surfacing as key points.
pub const ENTITY_LABELS: &[&str] = &["DATE", "MONEY", "PERCENT", "TIME"];

pub struct EntityRecognizer {
    model: Arc<dyn EntityModel>,
}

impl EntityRecognizer {
    pub fn new(model: Arc<dyn EntityModel>) -> Self {
        Self { model }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// One `entity` candidate per retained span, with its sentence as
    /// context.
    pub fn extract(&self, text: &str) -> anyhow::Result<Vec<CandidatePoint>> {
        let spans = self.model.recognize(text)?;
        let sentences = sentences(text);

        let points = spans
            .into_iter()
            .filter(|s| ENTITY_LABELS.contains(&s.label.as_str()))
            .filter_map(|s| {
                let surface = text.get(s.start..s.end)?.trim();
                if surface.is_empty() {
                    return None;
                }
                let context = sentences
                    .iter()
                    .find(|sent| sent.contains_offset(s.start))
                    .map(|sent| sent.text.as_str())
                    .unwrap_or(surface);
                Some(
                    CandidatePoint::new(surface, Category::Entity, MEDIUM_CONFIDENCE, s.start)
                        .with_entity_type(s.label.as_str())
                        .with_context(context),
                )
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntitySpan;
    use crate::ner::PatternNer;
    use clausewise_core::point::HIGH_CONFIDENCE;

    struct FixedModel(Vec<EntitySpan>);

    impl EntityModel for FixedModel {
        fn model_id(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _text: &str) -> anyhow::Result<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    fn span(label: &str, start: usize, end: usize) -> EntitySpan {
        EntitySpan {
            label: label.into(),
            start,
            end,
        }
    }

    #[test]
    fn keeps_only_legal_entity_types() {
        let text = "Acme Corp pays $500 on Friday.";
        let recognizer = EntityRecognizer::new(Arc::new(FixedModel(vec![
            span("ORG", 0, 9),
            span("MONEY", 15, 19),
            span("DATE", 23, 29),
        ])));
        let points = recognizer.extract(text).unwrap();
        let kinds: Vec<&str> = points.iter().filter_map(|p| p.entity_type()).collect();
        assert_eq!(kinds, vec!["MONEY", "DATE"]);
        assert_eq!(points[0].text(), "$500");
        assert_eq!(points[1].text(), "Friday");
    }

    #[test]
    fn medium_tier_below_patterns() {
        let recognizer = EntityRecognizer::new(Arc::new(PatternNer::new()));
        let points = recognizer.extract("Rent of $1,500.00 is due by March 1, 2025.").unwrap();
        assert!(!points.is_empty());
        for p in &points {
            assert_eq!(p.category(), Category::Entity);
            assert_eq!(p.confidence(), MEDIUM_CONFIDENCE);
            assert!(p.confidence() < HIGH_CONFIDENCE);
        }
    }

    #[test]
    fn context_is_containing_sentence() {
        let text = "Preamble. The fee is 5% per annum.";
        let recognizer = EntityRecognizer::new(Arc::new(PatternNer::new()));
        let points = recognizer.extract(text).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].entity_type(), Some("PERCENT"));
        assert_eq!(points[0].context(), Some("The fee is 5% per annum."));
    }

    #[test]
    fn out_of_range_spans_are_skipped() {
        let recognizer = EntityRecognizer::new(Arc::new(FixedModel(vec![span("DATE", 5, 500)])));
        assert!(recognizer.extract("short text").unwrap().is_empty());
    }
}
