//! Sentence segmentation and small string helpers shared by the extractors.

use unicode_segmentation::UnicodeSegmentation;

/// A trimmed sentence and its byte offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
}

impl Sentence {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// Split text into non-empty sentences using Unicode sentence boundaries.
///
/// Single line breaks are treated as spaces (OCR output wraps lines mid
/// sentence); blank lines still separate sentences. Offsets refer to the
/// original text.
pub fn sentences(text: &str) -> Vec<Sentence> {
    let normalized = join_wrapped_lines(text);
    normalized
        .split_sentence_bound_indices()
        .filter_map(|(offset, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lead = raw.len() - raw.trim_start().len();
            Some(Sentence {
                text: trimmed.to_string(),
                start: offset + lead,
            })
        })
        .collect()
}

/// Replace lone `\n` (and `\r`) with spaces. Byte length is preserved.
fn join_wrapped_lines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '\r' => out.push(' '),
            '\n' => {
                let prev_nl = i > 0 && matches!(bytes[i - 1], b'\n' | b'\r') && !is_lone_cr(bytes, i - 1);
                let next_nl = bytes.get(i + 1).is_some_and(|b| matches!(b, b'\n' | b'\r'));
                if prev_nl || next_nl {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// A `\r` directly followed by `\n` belongs to that line break.
fn is_lone_cr(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') && (i == 0 || bytes[i - 1] != b'\n')
}

/// The first `limit` whitespace-separated words, single-spaced.
pub fn first_words(text: &str, limit: usize) -> String {
    text.split_whitespace().take(limit).collect::<Vec<_>>().join(" ")
}

/// Up to `radius` characters either side of `start..end`, clamped to the text
/// and to char boundaries, then trimmed.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let start = floor_char_boundary(text, start.min(text.len()));
    let end = floor_char_boundary(text, end.min(text.len())).max(start);

    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[from..to].trim()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Naive `.`-separated pieces, trimmed, used by the rule-based tier.
pub fn period_pieces(text: &str) -> impl Iterator<Item = &str> {
    text.split('.').map(str::trim)
}
