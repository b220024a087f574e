//! Critical-point detection over raw text with the pattern catalog.

use std::cmp::Reverse;

use clausewise_core::catalog::PatternCatalog;
use clausewise_core::point::HIGH_CONFIDENCE;
use clausewise_core::text::context_window;
use clausewise_core::CandidatePoint;

/// Characters of context captured either side of a match.
pub const CONTEXT_RADIUS: usize = 100;

/// Every non-overlapping match of every catalog pattern, with surrounding
/// context. Results are in catalog order; see [`order_critical_points`].
pub fn detect_critical_points(text: &str, catalog: &PatternCatalog) -> Vec<CandidatePoint> {
    let mut found = Vec::new();
    for entry in catalog.entries() {
        for m in entry.regex.find_iter(text) {
            let context = context_window(text, m.start(), m.end(), CONTEXT_RADIUS);
            found.push(
                CandidatePoint::new(m.as_str(), entry.category, HIGH_CONFIDENCE, m.start())
                    .with_context(context),
            );
        }
    }
    found
}

/// Order critical points for presentation.
///
/// Points at or above the HIGH confidence tier come first. Within a tier,
/// later positions in the document come first, so the most recent mention
/// of a deadline or amount leads. The sort is stable, so equal positions
/// keep catalog order.
pub fn order_critical_points(points: &mut [CandidatePoint]) {
    points.sort_by_key(|p| (Reverse(p.confidence() >= HIGH_CONFIDENCE), Reverse(p.position())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::Category;

    const RENT: &str = "Rent of $1,500.00 is due by March 1, 2025.";

    #[test]
    fn rent_sentence_yields_amount_and_deadline() {
        let points = detect_critical_points(RENT, PatternCatalog::standard());
        let amount = points
            .iter()
            .find(|p| p.category() == Category::Amount)
            .unwrap();
        assert_eq!(amount.text(), "$1,500.00");
        assert_eq!(amount.position(), 8);
        assert_eq!(amount.confidence(), HIGH_CONFIDENCE);
        assert_eq!(amount.context(), Some(RENT));

        assert!(
            points
                .iter()
                .any(|p| p.category() == Category::Deadline && p.text().contains("March 1, 2025"))
        );
    }

    #[test]
    fn context_is_clamped_to_radius() {
        let padding = "x".repeat(300);
        let text = format!("{padding} $20 {padding}");
        let points = detect_critical_points(&text, PatternCatalog::standard());
        let amount = points.iter().find(|p| p.text() == "$20").unwrap();
        let context = amount.context().unwrap();
        assert_eq!(context.chars().count(), 203);
    }

    #[test]
    fn ordering_puts_later_mentions_first() {
        let text = "A fee of $10 applies. Later, a fee of $25 applies.";
        let mut points = detect_critical_points(text, PatternCatalog::standard());
        order_critical_points(&mut points);
        let positions: Vec<usize> = points.iter().map(|p| p.position()).collect();
        let mut sorted = positions.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(positions, sorted);
    }

    #[test]
    fn ordering_puts_high_tier_first() {
        let mut points = vec![
            CandidatePoint::new("late", Category::Entity, 0.6, 90),
            CandidatePoint::new("early", Category::Amount, HIGH_CONFIDENCE, 5),
        ];
        order_critical_points(&mut points);
        assert_eq!(points[0].text(), "early");
    }

    #[test]
    fn plain_text_has_no_critical_points() {
        assert!(detect_critical_points("Nothing of note here.", PatternCatalog::standard()).is_empty());
    }
}
