//! The deterministic rule tier. Nothing here can fail, and every function
//! returns a non-empty result for any input.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use clausewise_core::catalog::{FALLBACK_KEYWORDS, GENERIC_REMINDERS, IMPORTANCE_KEYWORDS, keyword_regex};
use clausewise_core::point::{KEYWORD_CONFIDENCE, REMINDER_CONFIDENCE};
use clausewise_core::text::first_words;
use clausewise_core::{AnalysisError, CandidatePoint, Category};

use crate::provider::{AnalysisProvider, Capabilities, ProviderDescriptor, ProviderKind};

pub const PREVIEW_WORDS: usize = 150;
const SUMMARY_SCAN: usize = 50;
const SUMMARY_MIN_CHARS: usize = 30;
const SUMMARY_MIN_KEYWORDS: usize = 2;
const SUMMARY_MAX_SENTENCES: usize = 5;
const POINTS_SCAN: usize = 20;
const POINTS_MAX: usize = 8;

const KEY_ELEMENTS_LEAD: &str = "This legal document contains the following key elements: ";

static IMPORTANCE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(IMPORTANCE_KEYWORDS));
static FALLBACK: LazyLock<Regex> = LazyLock::new(|| keyword_regex(FALLBACK_KEYWORDS));

/// `.`-separated pieces, trimmed, with their byte offsets.
fn pieces(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('.').map(move |raw| {
        let start = offset + (raw.len() - raw.trim_start().len());
        offset += raw.len() + 1;
        (start, raw.trim())
    })
}

fn distinct_keywords(re: &Regex, sentence: &str) -> usize {
    re.find_iter(sentence)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// Quote up to five sentences dense in legal terms, or fall back to a
/// word preview.
pub fn rule_summary(text: &str) -> String {
    let important: Vec<&str> = pieces(text)
        .take(SUMMARY_SCAN)
        .map(|(_, s)| s)
        .filter(|s| s.chars().count() > SUMMARY_MIN_CHARS)
        .filter(|s| distinct_keywords(&IMPORTANCE, s) >= SUMMARY_MIN_KEYWORDS)
        .take(SUMMARY_MAX_SENTENCES)
        .collect();

    if important.is_empty() {
        format!("Legal document analysis: {}...", first_words(text, PREVIEW_WORDS))
    } else {
        format!("{KEY_ELEMENTS_LEAD}{}.", important.join(". "))
    }
}

/// Summary used when every provider failed.
pub fn preview_summary(text: &str) -> String {
    format!(
        "AI summarization unavailable. Document preview: {}...",
        first_words(text, PREVIEW_WORDS)
    )
}

/// Sentences mentioning an obligation keyword, or the generic reminders.
pub fn keyword_points(text: &str) -> Vec<CandidatePoint> {
    let points: Vec<CandidatePoint> = pieces(text)
        .take(POINTS_SCAN)
        .filter(|(_, s)| {
            let len = s.chars().count();
            len > 20 && len < 200
        })
        .filter(|(_, s)| FALLBACK.is_match(s))
        .take(POINTS_MAX)
        .map(|(start, s)| CandidatePoint::new(s, Category::Keyword, KEYWORD_CONFIDENCE, start))
        .collect();

    if points.is_empty() { reminder_points() } else { points }
}

pub fn reminder_points() -> Vec<CandidatePoint> {
    GENERIC_REMINDERS
        .iter()
        .map(|r| CandidatePoint::new(*r, Category::Reminder, REMINDER_CONFIDENCE, 0))
        .collect()
}

/// Provider wrapper around the rule tier; always the last registry entry.
pub struct RuleBasedFallback {
    descriptor: ProviderDescriptor,
}

impl RuleBasedFallback {
    pub const NAME: &'static str = "rule-based";

    pub fn new(priority: u32) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                name: Self::NAME.to_string(),
                priority,
                capability: Capabilities::BOTH,
            },
        }
    }
}

#[async_trait]
impl AnalysisProvider for RuleBasedFallback {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::RuleBasedFallback
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        Ok(rule_summary(text))
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidatePoint>, AnalysisError> {
        Ok(keyword_points(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEASE: &str = "This agreement is made between the parties named below. \
        The tenant shall make each payment on the first day of the month. \
        The sky was grey. \
        Either party may seek damages for any breach of this contract.";

    #[test]
    fn summary_quotes_dense_sentences() {
        let summary = rule_summary(LEASE);
        assert_eq!(
            summary,
            "This legal document contains the following key elements: \
             This agreement is made between the parties named below. \
             The tenant shall make each payment on the first day of the month. \
             Either party may seek damages for any breach of this contract."
        );
    }

    #[test]
    fn summary_falls_back_to_preview() {
        let text = "Plain words without anything notable in them at all, just filler text";
        assert_eq!(rule_summary(text), format!("Legal document analysis: {text}..."));
    }

    #[test]
    fn preview_caps_words() {
        let text = "word ".repeat(400);
        let preview = preview_summary(&text);
        assert!(preview.starts_with("AI summarization unavailable. Document preview: word"));
        assert_eq!(preview.matches("word").count(), PREVIEW_WORDS);
    }

    #[test]
    fn keyword_points_carry_offsets() {
        let points = keyword_points(LEASE);
        let texts: Vec<&str> = points.iter().map(|p| p.text()).collect();
        assert_eq!(
            texts,
            vec![
                "The tenant shall make each payment on the first day of the month",
                "Either party may seek damages for any breach of this contract",
            ]
        );
        let p = &points[0];
        assert_eq!(&LEASE[p.position()..p.position() + p.text().len()], p.text());
        assert_eq!(p.category(), Category::Keyword);
        assert_eq!(p.confidence(), 0.5);
    }

    #[test]
    fn no_keywords_yields_reminders() {
        let points = keyword_points("Nothing of legal interest is written in this long sentence");
        assert_eq!(points.len(), GENERIC_REMINDERS.len());
        assert!(points.iter().all(|p| p.category() == Category::Reminder));
        assert!(points.iter().all(|p| p.confidence() == REMINDER_CONFIDENCE));
    }

    #[test]
    fn keyword_needs_whole_word() {
        // "mustard" is not "must".
        let points = keyword_points("The picnic basket contained mustard and bread rolls");
        assert_eq!(points[0].category(), Category::Reminder);
    }

    #[tokio::test]
    async fn provider_never_fails() {
        let provider = RuleBasedFallback::new(100);
        assert!(!provider.summarize("").await.unwrap().is_empty());
        assert!(!provider.extract("").await.unwrap().is_empty());
        assert_eq!(provider.kind(), ProviderKind::RuleBasedFallback);
    }
}
