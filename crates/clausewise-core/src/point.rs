//! Candidate key points produced by the extractors.

use serde::Serialize;

/// Confidence assigned to pattern-catalog matches.
pub const HIGH_CONFIDENCE: f32 = 0.9;
/// Confidence assigned to recognised entities. Always below [`HIGH_CONFIDENCE`].
pub const MEDIUM_CONFIDENCE: f32 = 0.6;
/// Obligation/right clauses found by the rule-based extractor.
pub const OBLIGATION_CONFIDENCE: f32 = 0.95;
/// Conditional clauses found by the rule-based extractor.
pub const CONDITION_CONFIDENCE: f32 = 0.85;
/// Points returned by a remote LLM provider.
pub const PROVIDER_CONFIDENCE: f32 = 0.95;
/// Sentences picked up by the keyword scan of the rule-based tier.
pub const KEYWORD_CONFIDENCE: f32 = 0.5;
/// Generic review reminders and notices.
pub const REMINDER_CONFIDENCE: f32 = 0.1;

/// What kind of extractor flagged a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Obligation,
    Condition,
    SemanticMatch,
    Deadline,
    Amount,
    OwnershipTransfer,
    Penalty,
    Entity,
    Error,
    ProviderExtracted,
    Keyword,
    Reminder,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obligation => "obligation",
            Self::Condition => "condition",
            Self::SemanticMatch => "semantic_match",
            Self::Deadline => "deadline",
            Self::Amount => "amount",
            Self::OwnershipTransfer => "ownership_transfer",
            Self::Penalty => "penalty",
            Self::Entity => "entity",
            Self::Error => "error",
            Self::ProviderExtracted => "provider_extracted",
            Self::Keyword => "keyword",
            Self::Reminder => "reminder",
        }
    }

    /// Emoji and label used when rendering pattern and entity hits.
    fn banner(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Deadline => Some(("⏰", "CRITICAL DEADLINE")),
            Self::Amount => Some(("💰", "FINANCIAL AMOUNT")),
            Self::OwnershipTransfer => Some(("🏠", "OWNERSHIP CHANGE")),
            Self::Penalty => Some(("⚠️", "PENALTY/FEE")),
            Self::Entity => Some(("📋", "IMPORTANT")),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span of source text flagged as legally significant.
///
/// Immutable once built. The confidence is clamped to `[0, 1]` on
/// construction, and [`CandidatePoint::dedup_key`] (lowercased text) is what
/// the ranker uses to collapse duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePoint {
    text: String,
    category: Category,
    confidence: f32,
    position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl CandidatePoint {
    pub fn new(text: impl Into<String>, category: Category, confidence: f32, position: usize) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            text: text.into(),
            category,
            confidence,
            position,
            matched_concept: None,
            entity_type: None,
            context: None,
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.matched_concept = Some(concept.into());
        self
    }

    pub fn with_entity_type(mut self, label: impl Into<String>) -> Self {
        self.entity_type = Some(label.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Byte offset of the span in the analysed text.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn matched_concept(&self) -> Option<&str> {
        self.matched_concept.as_deref()
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn dedup_key(&self) -> String {
        self.text.to_lowercase()
    }

    /// Render the candidate as a user-facing key point line.
    pub fn render(&self) -> String {
        if let Some((emoji, label)) = self.category.banner() {
            let label = match (&self.category, self.entity_type()) {
                (Category::Entity, Some(kind)) => format!("{label} ({kind})"),
                _ => label.to_string(),
            };
            let context: String = self.context().unwrap_or_default().chars().take(100).collect();
            return format!("{emoji} {label}: {} - {context}...", self.text);
        }
        match self.category {
            Category::Keyword => format!("⚖️ {}", self.text),
            _ => self.text.clone(),
        }
    }
}
