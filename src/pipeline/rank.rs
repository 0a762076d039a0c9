//! Page ranking: score pages against a question and keep the best few.
//!
//! Sending every page of a 40-sheet drawing set to a vision model is slow
//! and expensive, and most sheets are irrelevant to any one question. The
//! ranker is a cheap lexical filter that runs entirely in memory:
//!
//! * +1 per word shared between the question and the page text,
//! * +5 when question intent words match the page's drawing type,
//! * +3 per extracted room name appearing in the question,
//! * +2 per extracted material appearing in the question.
//!
//! Pages scoring zero are excluded outright; the rest are sorted by score
//! descending with a stable sort, so equal-scoring pages keep document
//! order. Only the top few survive.

use crate::types::{Page, PageType};
use std::collections::HashSet;
use tracing::debug;

/// Question words that signal interest in a particular drawing type.
const TYPE_HINTS: &[(PageType, &[&str])] = &[
    (PageType::FloorPlan, &["floor", "room", "layout", "space"]),
    (PageType::Elevation, &["elevation", "front", "back", "side"]),
    (PageType::FoundationPlan, &["foundation", "basement"]),
    (PageType::RoofPlan, &["roof", "attic"]),
];

/// Weight for a shared word between question and page text.
const WORD_OVERLAP_WEIGHT: u32 = 1;
/// Weight for a drawing-type hint in the question.
const TYPE_HINT_WEIGHT: u32 = 5;
/// Weight for a room name from the page appearing in the question.
const ROOM_WEIGHT: u32 = 3;
/// Weight for a material from the page appearing in the question.
const MATERIAL_WEIGHT: u32 = 2;

/// Score one page against a question. Pure and deterministic.
pub fn score_page(query: &str, page: &Page) -> u32 {
    let query_lower = query.to_lowercase();
    let text_lower = page.text.to_lowercase();

    let mut score = 0u32;

    // Word overlap between question and page text, set semantics: a word
    // repeated in either side still counts once.
    let query_words: HashSet<&str> = query_lower.split_whitespace().collect();
    let text_words: HashSet<&str> = text_lower.split_whitespace().collect();
    score += query_words.intersection(&text_words).count() as u32 * WORD_OVERLAP_WEIGHT;

    // Drawing-type intent.
    for (page_type, hints) in TYPE_HINTS {
        if page.page_type == *page_type && hints.iter().any(|h| query_lower.contains(h)) {
            score += TYPE_HINT_WEIGHT;
        }
    }

    // Metadata hits: the question names a room or material this page has.
    for room in &page.metadata.rooms {
        if query_lower.contains(room.as_str()) {
            score += ROOM_WEIGHT;
        }
    }
    for material in &page.metadata.materials {
        if query_lower.contains(material.as_str()) {
            score += MATERIAL_WEIGHT;
        }
    }

    score
}

/// Select the `top_pages` most relevant pages for a question.
///
/// Returns references in descending score order; ties keep document order.
/// An empty result means no page had any lexical connection to the question.
pub fn rank_pages<'a>(query: &str, pages: &'a [Page], top_pages: usize) -> Vec<&'a Page> {
    let mut scored: Vec<(u32, &Page)> = pages
        .iter()
        .map(|page| (score_page(query, page), page))
        .filter(|(score, _)| *score > 0)
        .collect();

    // Stable sort: equal scores keep ascending page order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    debug!(
        query_len = query.len(),
        candidates = scored.len(),
        "ranked pages for question"
    );

    scored
        .into_iter()
        .take(top_pages)
        .map(|(_, page)| page)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageMetadata;
    use std::path::PathBuf;

    fn page(n: usize, text: &str, page_type: PageType, metadata: PageMetadata) -> Page {
        Page {
            page_number: n,
            text: text.to_string(),
            image_path: PathBuf::from(format!("p{n}.png")),
            page_type,
            metadata,
        }
    }

    #[test]
    fn room_metadata_outranks_plain_text() {
        let pages = vec![
            page(1, "general notes sheet", PageType::General, PageMetadata::default()),
            page(
                2,
                "main level",
                PageType::FloorPlan,
                PageMetadata {
                    rooms: vec!["kitchen".into()],
                    ..Default::default()
                },
            ),
        ];
        let ranked = rank_pages("how big is the kitchen", &pages, 3);
        assert_eq!(ranked[0].page_number, 2);
        // type hint ("room"? no) — scores: page 2 gets +3 room; page 1 zero.
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn type_hint_adds_five() {
        let p = page(1, "", PageType::Elevation, PageMetadata::default());
        assert_eq!(score_page("front view please", &p), 5);
    }

    #[test]
    fn word_overlap_counts_distinct_words() {
        let p = page(1, "kitchen sink and kitchen island", PageType::General, PageMetadata::default());
        // "kitchen" and "sink" each appear in the page text.
        assert_eq!(score_page("kitchen sink", &p), 2);
    }

    #[test]
    fn repeated_query_words_count_once() {
        let p = page(1, "kitchen layout", PageType::General, PageMetadata::default());
        assert_eq!(score_page("kitchen kitchen kitchen", &p), 1);
        // Repetition on the page side does not inflate the score either.
        let p2 = page(2, "kitchen kitchen kitchen", PageType::General, PageMetadata::default());
        assert_eq!(score_page("kitchen", &p2), 1);
    }

    #[test]
    fn zero_score_pages_are_excluded() {
        let pages = vec![page(1, "roof framing", PageType::RoofPlan, PageMetadata::default())];
        let ranked = rank_pages("kitchen dimensions", &pages, 3);
        assert!(ranked.is_empty());
    }

    #[test]
    fn ties_keep_document_order() {
        let pages = vec![
            page(3, "concrete slab", PageType::General, PageMetadata::default()),
            page(7, "concrete wall", PageType::General, PageMetadata::default()),
        ];
        let ranked = rank_pages("concrete", &pages, 3);
        assert_eq!(ranked[0].page_number, 3);
        assert_eq!(ranked[1].page_number, 7);
    }

    #[test]
    fn result_capped_at_top_pages() {
        let pages: Vec<Page> = (1..=6)
            .map(|n| page(n, "floor plan sheet", PageType::FloorPlan, PageMetadata::default()))
            .collect();
        let ranked = rank_pages("floor plan", &pages, 3);
        assert_eq!(ranked.len(), 3);
    }
}
