//! Error types for the blueprint-chat library.
//!
//! One enum covers both request-scoped failures (bad upload, unknown
//! document) and startup failures (provider not configured). Two external
//! boundaries deliberately do NOT surface here:
//!
//! * an unreadable page image during answer composition is skipped and
//!   logged — the evidence set degrades but the request proceeds;
//! * a failed model invocation is converted into a structured low-confidence
//!   [`crate::types::ChatResult`] so the chat operation never raises past
//!   that boundary.
//!
//! The HTTP status mapping lives in [`crate::server`]; this module stays
//! transport-agnostic.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the blueprint-chat library.
#[derive(Debug, Error)]
pub enum BlueprintError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The uploaded filename does not end in `.pdf`.
    #[error("Only PDF files are supported, got '{filename}'")]
    UnsupportedFileType { filename: String },

    /// The upload carried no file field or an empty body.
    #[error("Upload contained no file data")]
    EmptyUpload,

    /// The file bytes do not start with the PDF magic marker.
    #[error("File '{filename}' is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { filename: String, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed by pdfium.
    #[error("PDF '{filename}' is corrupt: {detail}")]
    CorruptPdf { filename: String, detail: String },

    /// pdfium returned an error while rendering a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not write a rendered page image to the image directory.
    #[error("Failed to write page image '{}': {detail}", path.display())]
    ImageWriteFailed { path: PathBuf, detail: String },

    // ── Query errors ──────────────────────────────────────────────────────
    /// No document with this identifier exists in the store.
    #[error("Document not found: '{id}'")]
    DocumentNotFound { id: String },

    /// Every page scored zero relevance for the query.
    #[error("No relevant pages found for this question")]
    NoRelevantPages,

    // ── Provider errors ───────────────────────────────────────────────────
    /// The configured vision provider is not initialised (missing API key
    /// etc.). Fatal at startup.
    #[error("Vision provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_type_display() {
        let e = BlueprintError::UnsupportedFileType {
            filename: "plan.docx".into(),
        };
        assert!(e.to_string().contains("plan.docx"));
        assert!(e.to_string().contains("PDF"));
    }

    #[test]
    fn document_not_found_display() {
        let e = BlueprintError::DocumentNotFound { id: "abc-123".into() };
        assert!(e.to_string().contains("abc-123"));
    }

    #[test]
    fn provider_not_configured_display_includes_hint() {
        let e = BlueprintError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "Set GEMINI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini"));
        assert!(msg.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn rasterisation_failed_display() {
        let e = BlueprintError::RasterisationFailed {
            page: 3,
            detail: "bitmap allocation".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }
}
