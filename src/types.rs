//! Domain types shared across the pipeline and the HTTP facade.
//!
//! Everything here is plain data: a [`Document`] is assembled once at
//! ingestion and never mutated afterwards, so handlers can hold cheap
//! `Arc<Document>` clones without locking. The request/response DTOs at the
//! bottom mirror the JSON wire format one-to-one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Categorical label for a construction-drawing page.
///
/// Exactly one tag per page. Assigned by the classifier in
/// [`crate::pipeline::classify`]; `General` is the fallback when no keyword
/// set matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    FoundationPlan,
    FloorPlan,
    FramingPlan,
    Elevation,
    Section,
    RoofPlan,
    Detail,
    General,
}

impl PageType {
    /// Wire/tag form, e.g. `"floor_plan"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::FoundationPlan => "foundation_plan",
            PageType::FloorPlan => "floor_plan",
            PageType::FramingPlan => "framing_plan",
            PageType::Elevation => "elevation",
            PageType::Section => "section",
            PageType::RoofPlan => "roof_plan",
            PageType::Detail => "detail",
            PageType::General => "general",
        }
    }

    /// Humanized form used in prompts and source references, e.g. `"Floor Plan"`.
    pub fn label(&self) -> &'static str {
        match self {
            PageType::FoundationPlan => "Foundation Plan",
            PageType::FloorPlan => "Floor Plan",
            PageType::FramingPlan => "Framing Plan",
            PageType::Elevation => "Elevation",
            PageType::Section => "Section",
            PageType::RoofPlan => "Roof Plan",
            PageType::Detail => "Detail",
            PageType::General => "General",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata pulled from a page's text by pattern matching.
///
/// Measurements, rooms, and materials are deduplicated. Symbols are
/// intentionally not deduplicated and notes keep first-match order, truncated
/// to ten entries — see [`crate::pipeline::extract`] for the rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub measurements: Vec<String>,
    pub rooms: Vec<String>,
    pub materials: Vec<String>,
    pub symbols: Vec<String>,
    pub notes: Vec<String>,
}

/// One processed page of a construction document. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based, contiguous within a document.
    pub page_number: usize,
    /// Raw text extracted by pdfium.
    pub text: String,
    /// Rendered PNG on disk, `{document_id}_page_{page_number}.png`.
    pub image_path: PathBuf,
    pub page_type: PageType,
    pub metadata: PageMetadata,
}

/// A processed document: write-once at ingestion, read-many afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier (uuid v4), generated at ingestion.
    pub id: String,
    pub filename: String,
    pub pages: Vec<Page>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Distinct page types in first-seen order.
    pub fn page_types(&self) -> Vec<PageType> {
        let mut types = Vec::new();
        for page in &self.pages {
            if !types.contains(&page.page_type) {
                types.push(page.page_type);
            }
        }
        types
    }
}

/// A structured reference to a page used as evidence for an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub page: usize,
    /// Humanized drawing type, e.g. `"Floor Plan"`.
    pub drawing_type: String,
    /// First 200 characters of the page text.
    pub content_preview: String,
    pub has_image: bool,
    pub rooms: Vec<String>,
    /// First 5 measurements only.
    pub measurements: Vec<String>,
}

/// The composed answer returned by the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    pub response: String,
    pub sources: Vec<Source>,
    /// Post-hoc heuristic in [0.1, 1.0]; 0.0 only in the model-failure result.
    pub confidence: f32,
    /// Pages whose image was successfully attached to the model request.
    pub pages_analyzed: Vec<usize>,
}

/// Per-page summary returned by the inspect endpoint — no full text or
/// image payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub page_number: usize,
    pub page_type: PageType,
    pub rooms: Vec<String>,
    pub measurements_count: usize,
    pub materials: Vec<String>,
}

impl PageSummary {
    pub fn from_page(page: &Page) -> Self {
        Self {
            page_number: page.page_number,
            page_type: page.page_type,
            rooms: page.metadata.rooms.clone(),
            measurements_count: page.metadata.measurements.len(),
            materials: page.metadata.materials.clone(),
        }
    }
}

/// Response body for the inspect endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPages {
    pub pages: Vec<PageSummary>,
}

/// Response body for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub filename: String,
    pub status: String,
    pub pages_count: usize,
    pub page_types: Vec<PageType>,
}

/// Request body for the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub document_id: String,
}
