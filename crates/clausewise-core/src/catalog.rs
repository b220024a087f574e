//! Static catalogs: critical-point regexes, legal-concept phrases, and the
//! keyword vocabularies used by the rule-based extractors and the enhancer.
//!
//! Everything here is compiled once per process and read-only afterwards.

use std::sync::LazyLock;

use regex::Regex;

use crate::point::Category;

/// Modal and legal-action words that mark an obligation or right.
pub const LEGAL_ACTION_WORDS: &[&str] = &[
    "shall",
    "must",
    "will",
    "may",
    "agrees",
    "obligated",
    "undertakes",
    "covenants",
];

/// Conditional markers. Multi-word markers match as consecutive tokens.
pub const CONDITIONAL_MARKERS: &[&str] = &[
    "if",
    "unless",
    "provided that",
    "in the event",
    "upon condition that",
    "subject to",
];

/// Canonical legal concepts for semantic matching, in tie-break order.
pub const TARGET_PHRASES: &[&str] = &[
    "indemnify the other party",
    "hold harmless from any losses",
    "liable for damages",
    "terminate the agreement",
    "expiration of this contract",
    "governing law",
    "dispute resolution mechanism",
    "confidential information",
    "force majeure event",
    "breach of contract",
    "assignment of rights",
    "intellectual property ownership",
    "warranties and representations",
    "effective date of this agreement",
    "notice period for termination",
    "payment schedule",
    "delivery terms",
    "default interest rate",
    "severability clause",
    "entire agreement clause",
    "amendment procedure",
    "jurisdiction of courts",
    "arbitration clause",
    "non-disclosure obligation",
    "limitation of liability",
    "representation and warranty",
    "due diligence",
    "escrow account",
    "lien on property",
    "guarantee of performance",
];

/// Keywords that earn a summary sentence the highlight marker.
///
/// Superset of [`LEGAL_ACTION_WORDS`] and [`CONDITIONAL_MARKERS`].
pub const HIGHLIGHT_KEYWORDS: &[&str] = &[
    "must", "shall", "will", "may", "agrees", "obligated", "undertakes", "covenants",
    "if", "unless", "provided that", "in the event", "upon condition that", "subject to",
    "liable", "liability", "indemnify", "hold harmless", "terminate", "expiration", "duration",
    "penalty", "breach", "default", "ownership", "title", "rights", "obligations", "warranties",
    "notwithstanding", "hereby", "herein", "thereof", "thereby", "agreement", "contract",
    "clause", "section", "article", "annexure", "schedule", "dispute", "arbitration",
    "jurisdiction", "governing law", "effective date", "commencement", "renewal", "notice",
    "consent", "waiver", "severability", "amendment", "assignment", "successors", "assigns",
    "force majeure", "confidential", "intellectual property", "damages", "injunction",
    "remedies", "representation", "warranty", "condition", "undertaking", "cancellation",
    "revocation", "validity", "enforceable", "binding", "stipulated", "except",
    "not limited to", "including but not limited to", "without prejudice", "hereunder",
];

/// Terms that make a sentence worth quoting in the rule-based summary.
pub const IMPORTANCE_KEYWORDS: &[&str] = &[
    "party",
    "parties",
    "agreement",
    "contract",
    "obligation",
    "shall",
    "must",
    "payment",
    "term",
    "termination",
    "liability",
    "breach",
    "damages",
    "intellectual property",
    "confidential",
    "dispute",
    "governing law",
];

/// Terms the rule-based key-point scan looks for.
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "shall",
    "must",
    "liable",
    "terminate",
    "payment",
    "breach",
    "obligation",
];

/// Shown when no provider and no keyword scan produced anything.
pub const GENERIC_REMINDERS: &[&str] = &[
    "📋 Review all terms and conditions carefully",
    "💰 Check payment obligations and deadlines",
    "⚖️ Understand liability and risk allocation",
    "🔄 Review termination and renewal clauses",
    "⚠️ Automatic analysis not available - manual review recommended",
];

pub const TOO_SHORT_SUMMARY: &str = "Document text too short for meaningful analysis.";
pub const TOO_SHORT_KEY_POINT: &str = "Document text too short for key point extraction.";

/// One compiled critical-point pattern.
#[derive(Debug)]
pub struct PatternCatalogEntry {
    pub category: Category,
    pub regex: Regex,
}

/// Ordered category → regex table for the critical-point detector.
#[derive(Debug)]
pub struct PatternCatalog {
    entries: Vec<PatternCatalogEntry>,
}

const DEADLINE_LEAD: &str =
    r"\b(?:due|payable|expires?|deadline|before|by|until|no later than)(?:\s+(?:on|by|before))?";

static STANDARD: LazyLock<PatternCatalog> = LazyLock::new(|| {
    let table: Vec<(Category, String)> = vec![
        (
            Category::Deadline,
            format!(r"(?i){DEADLINE_LEAD}\s+\d{{1,2}}[/\-.]\d{{1,2}}[/\-.]\d{{2,4}}"),
        ),
        (
            Category::Deadline,
            format!(r"(?i){DEADLINE_LEAD}\s+[a-z]+\.?\s+\d{{1,2}},?\s+\d{{4}}"),
        ),
        (
            Category::Deadline,
            r"(?i)\bwithin\s+(?:[a-z]+(?:-[a-z]+)?\s+)?\(?\d+\)?\s+(?:business\s+)?(?:days?|months?|years?)\b".into(),
        ),
        (
            Category::Deadline,
            r"(?i)\b\d+\)?\s+(?:business\s+)?(?:days?|months?|years?)\s+(?:from|after|before)\b".into(),
        ),
        (Category::Amount, r"\$\s?\d[\d,]*(?:\.\d{2})?".into()),
        (
            Category::Amount,
            r"(?i)\b(?:USD|dollars?)\s*\d[\d,]*(?:\.\d{2})?".into(),
        ),
        (
            Category::Amount,
            r"(?i)\b\d[\d,]*(?:\.\d{2})?\s*(?:USD|dollars?)\b".into(),
        ),
        (
            Category::OwnershipTransfer,
            r"(?i)\b(?:ownership|property|title|rights?)\s+(?:will\s+be\s+|shall\s+be\s+)?(?:transfer(?:s|red)?|chang(?:e|es|ed)|assign(?:s|ed)?|convey(?:s|ed)?)\b".into(),
        ),
        (
            Category::OwnershipTransfer,
            r"(?i)\b(?:transfer|change|assign|convey)\s+(?:of\s+)?(?:ownership|property|title|rights?)\b".into(),
        ),
        (
            Category::OwnershipTransfer,
            r"(?i)\b(?:forfeit|lose|relinquish)\s+(?:ownership|property|title|rights?)\b".into(),
        ),
        (
            Category::Penalty,
            r"(?i)\b(?:penalty|fine|fee|charge|interest)\s+of\s+\$?\d[\d,]*(?:\.\d{2})?".into(),
        ),
        (
            Category::Penalty,
            r"(?i)\b(?:late|penalty|additional)\s+(?:fee|charge|interest)s?\b".into(),
        ),
        (
            Category::Penalty,
            r"(?i)\b(?:forfeit|lose|penalty)\s+\$?\d[\d,]*".into(),
        ),
    ];

    let entries = table
        .into_iter()
        .map(|(category, pattern)| PatternCatalogEntry {
            category,
            regex: Regex::new(&pattern)
                .unwrap_or_else(|e| panic!("invalid {category} pattern {pattern:?}: {e}")),
        })
        .collect();
    PatternCatalog { entries }
});

impl PatternCatalog {
    /// The built-in catalog covering deadlines, amounts, ownership transfer, and penalties.
    pub fn standard() -> &'static PatternCatalog {
        &STANDARD
    }

    pub fn entries(&self) -> &[PatternCatalogEntry] {
        &self.entries
    }

    /// Patterns for a single category, in catalog order.
    pub fn for_category(&self, category: Category) -> impl Iterator<Item = &Regex> {
        self.entries
            .iter()
            .filter(move |e| e.category == category)
            .map(|e| &e.regex)
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.category) {
                out.push(e.category);
            }
        }
        out
    }
}

/// Build a case-insensitive, word-bounded alternation over a keyword list.
///
/// Longer keywords are tried first so "including but not limited to" wins
/// over "not limited to".
pub fn keyword_regex(keywords: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = keywords.to_vec();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .unwrap_or_else(|e| panic!("invalid keyword alternation: {e}"))
}
