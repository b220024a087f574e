//! Cosmetic highlighting of summary sentences that mention legal terms.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{HIGHLIGHT_KEYWORDS, keyword_regex};
use crate::text::sentences;

pub const HIGHLIGHT_MARKER: &str = "⚖️";

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| keyword_regex(HIGHLIGHT_KEYWORDS));

/// Prefix every summary sentence that contains a highlight keyword with
/// [`HIGHLIGHT_MARKER`]. Line breaks and sentence terminators are kept, so a
/// bulleted summary stays one bullet per line. Sentences already carrying the
/// marker are left alone.
pub fn enhance_summary(summary: &str) -> String {
    let lines: Vec<String> = summary
        .split('\n')
        .map(|line| enhance_line(line.trim_end_matches('\r')))
        .collect();
    lines.join("\n").trim_matches('\n').to_string()
}

fn enhance_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    for sentence in sentences(line) {
        if !out.is_empty() {
            out.push(' ');
        }
        if !sentence.text.starts_with(HIGHLIGHT_MARKER) && HIGHLIGHT.is_match(&sentence.text) {
            out.push_str(HIGHLIGHT_MARKER);
            out.push(' ');
        }
        out.push_str(&sentence.text);
    }
    out
}
