//! Prompt text for the vision model.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the assistant's evidentiary
//!    rules or the page-context layout requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled context blocks
//!    directly without spinning up a real model.
//!
//! The message contract matters: each page's context block is immediately
//! followed by that page's rendered image, so the model can correlate what
//! it sees with the text that introduced it. [`build_page_context`] produces
//! exactly one such block.

use crate::types::Page;

/// System instruction sent at the head of every chat request.
pub const SYSTEM_PROMPT: &str = r#"You are a professional construction document assistant with expertise in reading architectural drawings, floor plans, elevations, and construction specifications.

Rules:
1. Analyze both the text content AND the visual elements in the drawings.
2. Look for measurements, dimensions, room labels, material callouts, and architectural symbols.
3. Only state information you can clearly see or read in the documents.
4. When referencing information, cite which page and what type of drawing it came from.
5. Read dimension lines, room sizes, and fixture dimensions from the drawings themselves.
6. If you cannot clearly see or read something, say so explicitly.

Drawing types you may see:
- Foundation Plans: footings, slabs, structural elements
- Floor Plans: room layouts, fixtures, dimensions
- Framing Plans: structural members, beams, joists
- Elevations: exterior views, materials, heights
- Sections: vertical cuts through the building
- Roof Plans: roof structure and materials
- Details: specific construction connections

Answer questions about sizes, materials, locations, specifications, and requirements based on what you can observe in the drawings."#;

/// Final instruction appended after all page context blocks and images.
pub const CLOSING_INSTRUCTION: &str =
    "Please analyze the images and provide a detailed answer based on what you \
     can see in the construction drawings.";

/// Build the textual context block for one selected page.
///
/// The block precedes the page image in the message sequence. Page text is
/// truncated to `snippet_chars` characters; measurement and note summaries
/// are capped so a metadata-dense sheet cannot crowd out the images.
pub fn build_page_context(page: &Page, snippet_chars: usize) -> String {
    let mut context = format!(
        "--- PAGE {} ({}) ---\n",
        page.page_number,
        page.page_type.label()
    );

    let text = page.text.trim();
    if !text.is_empty() {
        let snippet: String = text.chars().take(snippet_chars).collect();
        context.push_str(&format!("Text Content: {snippet}...\n"));
    }

    let meta = &page.metadata;
    if !meta.rooms.is_empty() {
        context.push_str(&format!("Rooms/Spaces: {}\n", meta.rooms.join(", ")));
    }
    if !meta.measurements.is_empty() {
        let shown: Vec<&str> = meta
            .measurements
            .iter()
            .take(10)
            .map(String::as_str)
            .collect();
        context.push_str(&format!("Measurements Found: {}\n", shown.join(", ")));
    }
    if !meta.materials.is_empty() {
        context.push_str(&format!("Materials: {}\n", meta.materials.join(", ")));
    }
    if !meta.notes.is_empty() {
        let shown: Vec<&str> = meta.notes.iter().take(3).map(String::as_str).collect();
        context.push_str(&format!("Notes: {}\n", shown.join("; ")));
    }

    // Marker tying the block to the image that follows it in the sequence.
    context.push_str(&format!(
        "\n[IMAGE: {} drawing for Page {}]\n",
        page.page_type.label(),
        page.page_number
    ));

    context
}
