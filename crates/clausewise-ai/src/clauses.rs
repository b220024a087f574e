//! Rule-based obligation and condition extraction.
//!
//! Both extractors work one sentence at a time and emit at most one
//! candidate per sentence, carrying the whole sentence as its text.

use clausewise_core::catalog::{CONDITIONAL_MARKERS, LEGAL_ACTION_WORDS};
use clausewise_core::point::{CONDITION_CONFIDENCE, OBLIGATION_CONFIDENCE};
use clausewise_core::{CandidatePoint, Category};

use crate::parser::{ParsedSentence, Token};

/// Sentences with a legal-action word acting as the main verb or an
/// auxiliary.
pub fn extract_obligations(parsed: &[ParsedSentence]) -> Vec<CandidatePoint> {
    parsed
        .iter()
        .filter(|s| {
            s.tokens
                .iter()
                .any(|t| t.role.is_verbal_head() && LEGAL_ACTION_WORDS.contains(&t.lower.as_str()))
        })
        .map(|s| {
            CandidatePoint::new(
                s.sentence.text.clone(),
                Category::Obligation,
                OBLIGATION_CONFIDENCE,
                s.sentence.start,
            )
        })
        .collect()
}

/// Sentences containing a conditional marker.
pub fn extract_conditions(parsed: &[ParsedSentence]) -> Vec<CandidatePoint> {
    let markers: Vec<Vec<&str>> = CONDITIONAL_MARKERS
        .iter()
        .map(|m| m.split_whitespace().collect())
        .collect();

    parsed
        .iter()
        .filter(|s| markers.iter().any(|m| contains_sequence(&s.tokens, m)))
        .map(|s| {
            CandidatePoint::new(
                s.sentence.text.clone(),
                Category::Condition,
                CONDITION_CONFIDENCE,
                s.sentence.start,
            )
        })
        .collect()
}

fn contains_sequence(tokens: &[Token], words: &[&str]) -> bool {
    if words.is_empty() || tokens.len() < words.len() {
        return false;
    }
    tokens
        .windows(words.len())
        .any(|w| w.iter().zip(words).all(|(t, word)| t.lower == *word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    const RENT: &str = "Tenant shall pay rent on the first of each month.";
    const DEFAULT: &str = "If the tenant defaults, the landlord may terminate the lease.";

    #[test]
    fn obligation_is_whole_sentence() {
        let parsed = Parser::new().parse(&format!("Preamble text here. {RENT}"));
        let found = extract_obligations(&parsed);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text(), RENT);
        assert_eq!(found[0].category(), Category::Obligation);
        assert_eq!(found[0].confidence(), 0.95);
        assert_eq!(found[0].position(), 20);
    }

    #[test]
    fn one_obligation_per_sentence() {
        let parsed = Parser::new().parse("The tenant shall and must and will pay.");
        assert_eq!(extract_obligations(&parsed).len(), 1);
    }

    #[test]
    fn relative_clause_and_pronoun_subject_are_obligations() {
        for sentence in [
            "Tenant is liable for any damages that may arise from misuse of the premises.",
            "This shall survive any termination of the lease.",
        ] {
            let found = extract_obligations(&Parser::new().parse(sentence));
            assert_eq!(found.len(), 1, "{sentence}");
            assert_eq!(found[0].text(), sentence);
        }
    }

    #[test]
    fn noun_uses_do_not_count() {
        let parsed = Parser::new().parse("The will was read on May 3.");
        assert!(extract_obligations(&parsed).is_empty());
    }

    #[test]
    fn condition_independent_of_obligation() {
        let parsed = Parser::new().parse(DEFAULT);
        let conditions = extract_conditions(&parsed);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].text(), DEFAULT);
        assert_eq!(conditions[0].category(), Category::Condition);
        assert_eq!(conditions[0].confidence(), 0.85);

        // "may terminate" also makes it an obligation/right.
        let obligations = extract_obligations(&parsed);
        assert_eq!(obligations.len(), 1);
        assert_eq!(obligations[0].text(), DEFAULT);
    }

    #[test]
    fn multi_word_marker_needs_adjacent_tokens() {
        let parsed = Parser::new().parse("Rent is payable provided that notice is given.");
        assert_eq!(extract_conditions(&parsed).len(), 1);

        let parsed = Parser::new().parse("The goods were provided. Notice that rent rose.");
        assert!(extract_conditions(&parsed).is_empty());
    }

    #[test]
    fn marker_inside_word_does_not_match() {
        let parsed = Parser::new().parse("The gift arrived on time.");
        assert!(extract_conditions(&parsed).is_empty());
    }
}
