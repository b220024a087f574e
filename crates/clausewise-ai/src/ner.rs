//! Entity recognition without a neural model, and BIO span aggregation for
//! token-classification models.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{EntityModel, EntitySpan};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let table = [
        (
            "DATE",
            format!(r"(?i)\b{MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
        ),
        (
            "DATE",
            format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\.?,?\s+\d{{4}}\b"),
        ),
        ("DATE", r"\b\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}\b".to_string()),
        ("DATE", r"\b\d{4}-\d{2}-\d{2}\b".to_string()),
        (
            "MONEY",
            r"(?i)\$\s?\d[\d,]*(?:\.\d+)?(?:\s+(?:million|billion|thousand))?".to_string(),
        ),
        (
            "MONEY",
            r"(?i)\b\d[\d,]*(?:\.\d+)?\s+(?:dollars?|usd|euros?)\b".to_string(),
        ),
        ("PERCENT", r"(?i)\b\d+(?:\.\d+)?\s?(?:%|percent\b)".to_string()),
        (
            "TIME",
            r"(?i)\b\d{1,2}(?::\d{2})?\s?(?:a\.m\.|p\.m\.|am\b|pm\b)".to_string(),
        ),
        ("TIME", r"(?i)\b(?:noon|midnight)\b".to_string()),
    ];
    table
        .into_iter()
        .map(|(label, pattern)| {
            let regex = Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid {label} rule: {e}"));
            (label, regex)
        })
        .collect()
});

/// Regex-driven recogniser for DATE, MONEY, PERCENT and TIME.
///
/// Used when no token-classification model is configured. Overlapping hits
/// resolve to the earliest, then longest, span.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternNer;

impl PatternNer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityModel for PatternNer {
    fn model_id(&self) -> &str {
        "pattern-ner"
    }

    fn recognize(&self, text: &str) -> anyhow::Result<Vec<EntitySpan>> {
        let mut spans: Vec<EntitySpan> = RULES
            .iter()
            .flat_map(|(label, re)| {
                re.find_iter(text).map(|m| EntitySpan {
                    label: label.to_string(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();
        spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

        let mut kept: Vec<EntitySpan> = Vec::with_capacity(spans.len());
        for span in spans {
            if kept.last().is_some_and(|k| span.start < k.end) {
                continue;
            }
            kept.push(span);
        }
        Ok(kept)
    }
}

/// One classified sub-word token: a BIO tag (`B-DATE`, `I-DATE`, `O`) and
/// its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub tag: String,
    pub start: usize,
    pub end: usize,
}

/// Merge BIO-tagged tokens into entity spans.
///
/// An `I-` tag continues the open span only when its type matches; otherwise
/// it starts a new span. Tokens with an empty byte span (special tokens) are
/// ignored.
pub fn aggregate_bio(tokens: &[TaggedToken]) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = Vec::new();
    let mut open: Option<EntitySpan> = None;

    for token in tokens {
        if token.start >= token.end {
            continue;
        }
        let (prefix, label) = match token.tag.split_once('-') {
            Some((p, l)) => (p, l),
            None => {
                spans.extend(open.take());
                continue;
            }
        };
        match open.as_mut() {
            Some(current) if prefix == "I" && current.label == label => {
                current.end = token.end;
            }
            _ => {
                spans.extend(open.take());
                open = Some(EntitySpan {
                    label: label.to_string(),
                    start: token.start,
                    end: token.end,
                });
            }
        }
    }
    spans.extend(open);
    spans
}
