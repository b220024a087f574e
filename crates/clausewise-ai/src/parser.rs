//! Lightweight syntactic tagging for clause extraction.
//!
//! This is not a full dependency parser. It tokenizes each sentence and
//! assigns the coarse roles the clause extractors care about: whether a
//! legal-action word is acting as the sentence's main verb, an auxiliary, or
//! a passive auxiliary, as opposed to a noun or name ("the will of the
//! testator", "May 1").

use unicode_segmentation::UnicodeSegmentation;

use clausewise_core::text::{self, Sentence};

/// Coarse syntactic role of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepRole {
    Root,
    Aux,
    AuxPass,
    Other,
}

impl DepRole {
    /// Root, auxiliary or passive auxiliary.
    pub fn is_verbal_head(self) -> bool {
        !matches!(self, DepRole::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    /// Byte offset within the sentence.
    pub start: usize,
    pub role: DepRole,
}

#[derive(Debug, Clone)]
pub struct ParsedSentence {
    pub sentence: Sentence,
    pub tokens: Vec<Token>,
}

const MODALS: &[&str] = &[
    "shall", "must", "will", "may", "can", "could", "should", "would", "might",
];
const BE_FORMS: &[&str] = &["is", "are", "was", "were", "be", "been", "being"];
// "this" and "that" are left out: before a modal they are usually pronouns
// ("damages that may arise", "This shall survive").
const DETERMINERS: &[&str] = &["the", "a", "an", "his", "her", "its", "their", "our", "my", "your"];
const MAIN_VERBS: &[&str] = &["agrees", "agree", "undertakes", "undertake", "covenants", "covenant"];

/// Splits text into sentences and tags each token with a [`DepRole`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Vec<ParsedSentence> {
        text::sentences(text)
            .into_iter()
            .map(|sentence| {
                let tokens = tag(&sentence.text);
                ParsedSentence { sentence, tokens }
            })
            .collect()
    }
}

fn tag(sentence: &str) -> Vec<Token> {
    let words: Vec<(usize, &str)> = sentence.unicode_word_indices().collect();

    let mut tokens = Vec::with_capacity(words.len());
    for (i, &(start, word)) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        let prev = i.checked_sub(1).map(|p| words[p].1.to_lowercase());
        let next = words.get(i + 1).map(|(_, w)| w.to_lowercase());
        let role = role_of(word, &lower, prev.as_deref(), next.as_deref());
        tokens.push(Token {
            text: word.to_string(),
            lower,
            start,
            role,
        });
    }
    tokens
}

fn role_of(word: &str, lower: &str, prev: Option<&str>, next: Option<&str>) -> DepRole {
    let after_determiner = prev.is_some_and(|p| DETERMINERS.contains(&p));

    if MODALS.contains(&lower) {
        if after_determiner {
            return DepRole::Other;
        }
        // "May 1" or "1 May" is a month.
        if word == "May" && (next.is_some_and(starts_with_digit) || prev.is_some_and(starts_with_digit)) {
            return DepRole::Other;
        }
        return match next {
            // A dangling modal ("... as the landlord may.") heads its clause.
            None => DepRole::Root,
            Some(_) => DepRole::Aux,
        };
    }

    if BE_FORMS.contains(&lower) && next.is_some_and(is_participle) {
        return DepRole::AuxPass;
    }

    if lower == "obligated" {
        return if after_determiner { DepRole::Other } else { DepRole::Root };
    }

    if MAIN_VERBS.contains(&lower) {
        return if after_determiner { DepRole::Other } else { DepRole::Root };
    }

    DepRole::Other
}

fn starts_with_digit(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_participle(word: &str) -> bool {
    word.len() > 3 && word.ends_with("ed")
}
