//! Deduplication and ranking of candidate key points.

use std::collections::HashMap;

use crate::point::CandidatePoint;

/// Collapse duplicates and keep the `limit` most confident candidates.
///
/// Candidates sharing a lowercased text keep the higher-confidence one; on a
/// tie the first one seen stays, and a replacement takes over its slot. The
/// sort is stable, so equal confidences retain input order (the pattern
/// detector relies on this for its most-recent-mention-first ordering).
/// The category of a discarded duplicate is not carried over.
pub fn rank_candidates(
    candidates: impl IntoIterator<Item = CandidatePoint>,
    limit: usize,
) -> Vec<CandidatePoint> {
    let mut unique: Vec<CandidatePoint> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let key = candidate.dedup_key();
        match slots.get(&key) {
            Some(&slot) => {
                if candidate.confidence() > unique[slot].confidence() {
                    unique[slot] = candidate;
                }
            }
            None => {
                slots.insert(key, unique.len());
                unique.push(candidate);
            }
        }
    }

    unique.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
    unique.truncate(limit);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Category;

    fn point(text: &str, category: Category, confidence: f32) -> CandidatePoint {
        CandidatePoint::new(text, category, confidence, 0)
    }

    #[test]
    fn duplicate_keeps_higher_confidence() {
        let ranked = rank_candidates(
            vec![
                point("Pay rent monthly.", Category::SemanticMatch, 0.6),
                point("PAY RENT MONTHLY.", Category::Obligation, 0.9),
            ],
            10,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].confidence(), 0.9);
        assert_eq!(ranked[0].category(), Category::Obligation);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let ranked = rank_candidates(
            vec![
                point("same", Category::Condition, 0.85),
                point("Same", Category::Keyword, 0.85),
            ],
            10,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category(), Category::Condition);
        assert_eq!(ranked[0].text(), "same");
    }

    #[test]
    fn obligation_and_condition_on_same_sentence_collapse() {
        let s = "If the tenant defaults, the landlord may terminate the lease.";
        let ranked = rank_candidates(
            vec![point(s, Category::Condition, 0.85), point(s, Category::Obligation, 0.95)],
            10,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category(), Category::Obligation);
    }

    #[test]
    fn truncates_to_limit_sorted_descending() {
        let candidates: Vec<CandidatePoint> = (0..15)
            .map(|i| point(&format!("clause {i}"), Category::Keyword, (i as f32 * 7.0 % 15.0) / 15.0))
            .collect();
        let ranked = rank_candidates(candidates, 10);
        assert_eq!(ranked.len(), 10);
        for pair in ranked.windows(2) {
            assert!(pair[0].confidence() > pair[1].confidence());
        }
    }

    #[test]
    fn equal_confidence_keeps_input_order() {
        let ranked = rank_candidates(
            vec![
                point("b", Category::Amount, 0.9),
                point("a", Category::Deadline, 0.9),
                point("c", Category::Obligation, 0.95),
            ],
            10,
        );
        let texts: Vec<&str> = ranked.iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["c", "b", "a"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(rank_candidates(Vec::new(), 10).is_empty());
    }
}
