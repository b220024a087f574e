//! Prompt text and parsing of LLM point lists.

pub const SUMMARY_MAX_TOKENS: u32 = 500;
pub const POINTS_MAX_TOKENS: u32 = 600;

/// Upper bound on points taken from one LLM response.
pub const MAX_REMOTE_POINTS: usize = 10;

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize this legal document in 2-3 paragraphs for someone without legal training, \
         focusing on key obligations, rights, deadlines and risks:\n\n{text}"
    )
}

pub fn points_prompt(text: &str) -> String {
    format!(
        "Extract 8-10 crucial legal points from this document. Format as a list with emojis:\n\n\
         {text}\n\n\
         Focus on: obligations, payments, termination, liability, deadlines, risks."
    )
}

fn is_bullet(c: char) -> bool {
    matches!(c, '•' | '-' | '*' | '.' | ' ') || c.is_ascii_digit()
}

/// Turn a free-form LLM list into clean point lines.
///
/// Drops blank lines, markdown headings and lines of ten characters or
/// fewer, strips leading bullets and numbering, and keeps at most
/// [`MAX_REMOTE_POINTS`].
pub fn parse_points(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && line.chars().count() > 10)
        .map(|line| line.trim_start_matches(is_bullet))
        .filter(|line| !line.is_empty())
        .take(MAX_REMOTE_POINTS)
        .map(str::to_string)
        .collect()
}
