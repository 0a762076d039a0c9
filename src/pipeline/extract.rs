//! Metadata extraction: pull structured facts out of raw page text.
//!
//! Five independent extractions, each a pure function of the text — no
//! cross-page state, so running one twice always yields the same sets.
//! Vocabularies and dimension patterns are declarative tables here rather
//! than literals scattered through the matching code; extending a vocabulary
//! is a one-line diff.
//!
//! Dedup semantics are intentionally uneven: measurements, rooms, and
//! materials are deduplicated; symbols are not (see [`extract_symbols`]);
//! notes keep first-match order and are truncated to ten entries overall.

use crate::types::PageMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

/// Dimension notations found on construction drawings.
static MEASUREMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)\d+'-\d+""#,                // 24'-6"
        r#"(?i)\d+"\s*x\s*\d+""#,          // 36" x 24"
        r#"(?i)\d+'\s*x\s*\d+'"#,          // 12' x 8'
        r"(?i)\d+\.\d+\s*x\s*\d+\.\d+",    // 12.5 x 8.25
        r"(?i)\d+\s*sf",                   // 450 sf
        r"(?i)\d+\s*sq\.?\s*ft",           // 450 sq ft
    ]
    .iter()
    .map(|p| Regex::new(p).expect("measurement pattern must compile"))
    .collect()
});

/// Room and space names recognised on floor plans.
const ROOM_TERMS: &[&str] = &[
    "kitchen",
    "bathroom",
    "bedroom",
    "living room",
    "dining room",
    "garage",
    "office",
    "closet",
    "pantry",
    "laundry",
    "foyer",
    "great room",
    "family room",
    "master bedroom",
    "guest bedroom",
    "bonus room",
    "media room",
    "study",
    "den",
    "utility",
    "mudroom",
    "powder room",
    "walk-in closet",
    "entry",
    "nook",
    "loft",
];

/// Material callouts recognised in specifications and schedules.
const MATERIAL_TERMS: &[&str] = &[
    "concrete",
    "steel",
    "wood",
    "lumber",
    "drywall",
    "gypsum",
    "insulation",
    "roofing",
    "siding",
    "flooring",
    "tile",
    "ceramic",
    "carpet",
    "hardwood",
    "vinyl",
    "granite",
    "quartz",
    "marble",
    "stainless steel",
    "aluminum",
    "brick",
    "stone",
    "glass",
    "laminate",
    "engineered wood",
    "composite",
];

/// Architectural elements and annotations.
const SYMBOL_TERMS: &[&str] = &[
    "door",
    "window",
    "outlet",
    "switch",
    "light fixture",
    "sink",
    "toilet",
    "bathtub",
    "shower",
    "stairs",
    "fireplace",
    "column",
    "beam",
    "wall",
    "dimension",
];

/// Note-introducer patterns; each match runs to end of line.
static NOTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)note:.*",
        r"(?i)see.*detail",
        r"(?i)typ\..*",
        r"(?i)typical.*",
        r"(?i)provide.*",
        r"(?i)install.*",
        r"(?i)verify.*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("note pattern must compile"))
    .collect()
});

/// Overall cap on extracted notes, across all patterns.
const MAX_NOTES: usize = 10;

/// Extract the full metadata record for one page's text.
pub fn extract_metadata(text: &str) -> PageMetadata {
    PageMetadata {
        measurements: extract_measurements(text),
        rooms: extract_rooms(text),
        materials: extract_materials(text),
        symbols: extract_symbols(text),
        notes: extract_notes(text),
    }
}

/// Measurements and dimensions, deduplicated.
pub fn extract_measurements(text: &str) -> Vec<String> {
    let mut measurements: Vec<String> = Vec::new();
    for pattern in MEASUREMENT_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let s = m.as_str().to_string();
            if !measurements.contains(&s) {
                measurements.push(s);
            }
        }
    }
    measurements
}

/// Room names present in the text, deduplicated (the vocabulary itself is
/// duplicate-free, so one presence pass suffices).
pub fn extract_rooms(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    ROOM_TERMS
        .iter()
        .filter(|term| text_lower.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Material specifications present in the text.
pub fn extract_materials(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    MATERIAL_TERMS
        .iter()
        .filter(|term| text_lower.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Architectural symbols and annotations, order-preserving.
///
/// Unlike the other extractions this applies no dedup pass — an asymmetry
/// kept on purpose rather than silently unified, since downstream consumers
/// may rely on the exact sequence.
pub fn extract_symbols(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut symbols = Vec::new();
    for term in SYMBOL_TERMS {
        if text_lower.contains(term) {
            symbols.push(term.to_string());
        }
    }
    symbols
}

/// Notes and specification callouts, concatenated across patterns and
/// truncated to the first [`MAX_NOTES`] matches overall.
pub fn extract_notes(text: &str) -> Vec<String> {
    let mut notes = Vec::new();
    for pattern in NOTE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            notes.push(m.as_str().to_string());
        }
    }
    notes.truncate(MAX_NOTES);
    notes
}
