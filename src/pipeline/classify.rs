//! Page classification: assign a drawing type from page text.
//!
//! An ordered keyword-set membership test. Predicates are evaluated in a
//! fixed priority order and the first whose keyword set matches wins; the
//! order is a deliberate tie-break, so a page mentioning both "elevation"
//! and "detail" classifies by whichever rule is listed first. Pages matching
//! nothing fall through to [`PageType::General`].
//!
//! The rules are one declarative table rather than a chain of conditionals:
//! the vocabulary is data, and the tie-break order is visible at a glance.

use crate::types::PageType;

/// Classification rules in priority order. First match wins.
const CLASSIFIER_RULES: &[(PageType, &[&str])] = &[
    (
        PageType::FoundationPlan,
        &["foundation plan", "foundation", "footing"],
    ),
    (
        PageType::FloorPlan,
        &["floor plan", "main floor", "upper floor"],
    ),
    (
        PageType::FramingPlan,
        &["framing plan", "framing", "beam", "joist"],
    ),
    (
        PageType::Elevation,
        &["elevation", "front", "rear", "left", "right"],
    ),
    (PageType::Section, &["section", "building section"]),
    (PageType::RoofPlan, &["roof plan", "roof framing"]),
    (PageType::Detail, &["detail", "wall detail", "window detail"]),
];

/// Classify a page's drawing type from its extracted text.
///
/// Case-insensitive substring matching; always returns a value.
pub fn classify_page(text: &str) -> PageType {
    let text_lower = text.to_lowercase();
    for (page_type, keywords) in CLASSIFIER_RULES {
        if keywords.iter().any(|kw| text_lower.contains(kw)) {
            return *page_type;
        }
    }
    PageType::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foundation_beats_elevation() {
        // Priority order is the tie-break: foundation is checked first.
        assert_eq!(
            classify_page("Foundation and rear elevation notes"),
            PageType::FoundationPlan
        );
    }

    #[test]
    fn foundation_plan_with_footing_detail() {
        assert_eq!(
            classify_page("Foundation Plan - Footing Detail, 24'-6\" x 12'-0\""),
            PageType::FoundationPlan
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_page("UPPER FLOOR PLAN"), PageType::FloorPlan);
        assert_eq!(classify_page("ROOF PLAN layout"), PageType::RoofPlan);
    }

    #[test]
    fn framing_outranks_roof() {
        // "roof framing" also contains "framing", and framing is checked
        // earlier in the priority order.
        assert_eq!(classify_page("Roof Framing Layout"), PageType::FramingPlan);
    }

    #[test]
    fn framing_keywords() {
        assert_eq!(classify_page("2x10 joist @ 16\" o.c."), PageType::FramingPlan);
    }

    #[test]
    fn detail_is_lowest_priority_named_type() {
        assert_eq!(classify_page("Window Detail 3/A5"), PageType::Detail);
        // "wall detail" also mentions nothing ranked higher
        assert_eq!(classify_page("typical wall detail"), PageType::Detail);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify_page("General notes and legend"), PageType::General);
        assert_eq!(classify_page(""), PageType::General);
    }

    #[test]
    fn every_rule_has_keywords() {
        for (_, keywords) in CLASSIFIER_RULES {
            assert!(!keywords.is_empty());
        }
    }
}
