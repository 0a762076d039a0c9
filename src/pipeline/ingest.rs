//! Document ingestion: uploaded PDF bytes in, analysed [`Document`] out.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the whole per-document pass (text
//! extraction plus rendering every page) onto the blocking pool so Tokio
//! worker threads keep serving requests.
//!
//! ## Why a temp file?
//!
//! pdfium wants a file-system path, not a byte buffer. The upload is spilled
//! to a `NamedTempFile` that lives exactly as long as the blocking pass; the
//! rendered page images, by contrast, are durable outputs written under the
//! configured image directory and referenced by the stored document.

use crate::config::ServiceConfig;
use crate::error::BlueprintError;
use crate::pipeline::{classify, extract};
use crate::types::{Document, Page};
use chrono::Utc;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ingest an uploaded PDF and produce a fully analysed document.
///
/// Validates the filename and magic bytes, then renders and analyses every
/// page. Rejections happen before pdfium is touched, so a mislabelled text
/// file fails fast with a typed error rather than a parser crash.
pub async fn ingest_document(
    filename: &str,
    bytes: Vec<u8>,
    config: &ServiceConfig,
) -> Result<Document, BlueprintError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(BlueprintError::UnsupportedFileType {
            filename: filename.to_string(),
        });
    }
    if bytes.is_empty() {
        return Err(BlueprintError::EmptyUpload);
    }
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(BlueprintError::NotAPdf {
            filename: filename.to_string(),
            magic,
        });
    }

    let document_id = Uuid::new_v4().to_string();
    info!(%document_id, filename, size = bytes.len(), "ingesting document");

    let id = document_id.clone();
    let name = filename.to_string();
    let image_dir = config.image_dir.clone();
    let max_pixels = config.max_rendered_pixels;

    let pages = tokio::task::spawn_blocking(move || {
        process_pdf_blocking(&id, &name, &bytes, &image_dir, max_pixels)
    })
    .await
    .map_err(|e| BlueprintError::Internal(format!("Ingest task panicked: {}", e)))??;

    info!(%document_id, pages = pages.len(), "document ingested");

    Ok(Document {
        id: document_id,
        filename: filename.to_string(),
        pages,
        created_at: Utc::now(),
    })
}

/// Blocking per-document pass: load with pdfium, then per page extract text,
/// render to PNG, classify, and pull metadata.
fn process_pdf_blocking(
    document_id: &str,
    filename: &str,
    bytes: &[u8],
    image_dir: &Path,
    max_pixels: u32,
) -> Result<Vec<Page>, BlueprintError> {
    let mut temp = NamedTempFile::new()
        .map_err(|e| BlueprintError::Internal(format!("Failed to create temp file: {}", e)))?;
    temp.write_all(bytes)
        .map_err(|e| BlueprintError::Internal(format!("Failed to spill upload: {}", e)))?;

    std::fs::create_dir_all(image_dir).map_err(|e| BlueprintError::ImageWriteFailed {
        path: image_dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let pdfium = Pdfium::default();
    let document =
        pdfium
            .load_pdf_from_file(temp.path(), None)
            .map_err(|e| BlueprintError::CorruptPdf {
                filename: filename.to_string(),
                detail: format!("{:?}", e),
            })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let doc_pages = document.pages();
    let mut pages = Vec::with_capacity(doc_pages.len() as usize);

    for (idx, page) in doc_pages.iter().enumerate() {
        let page_number = idx + 1;

        // Embedded text layer; scanned sheets legitimately yield nothing.
        let text = page.text().map(|t| t.all()).unwrap_or_default();

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| BlueprintError::RasterisationFailed {
                    page: page_number,
                    detail: format!("{:?}", e),
                })?;
        let image = bitmap.as_image();

        let image_path = image_dir.join(format!("{document_id}_page_{page_number}.png"));
        image
            .save(&image_path)
            .map_err(|e| BlueprintError::ImageWriteFailed {
                path: image_path.clone(),
                detail: e.to_string(),
            })?;

        debug!(
            page = page_number,
            width = image.width(),
            height = image.height(),
            text_len = text.len(),
            "rendered page"
        );

        let page_type = classify::classify_page(&text);
        let metadata = extract::extract_metadata(&text);

        pages.push(Page {
            page_number,
            text,
            image_path,
            page_type,
            metadata,
        });
    }

    if pages.is_empty() {
        warn!(%document_id, "PDF contained no pages");
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_pdf_extension_rejected() {
        let config = ServiceConfig::default();
        let err = ingest_document("plan.docx", b"%PDF-1.7".to_vec(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BlueprintError::UnsupportedFileType { .. }));
    }

    #[tokio::test]
    async fn empty_upload_rejected() {
        let config = ServiceConfig::default();
        let err = ingest_document("plan.pdf", Vec::new(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BlueprintError::EmptyUpload));
    }

    #[tokio::test]
    async fn bad_magic_rejected_before_pdfium() {
        let config = ServiceConfig::default();
        let err = ingest_document("plan.pdf", b"hello world".to_vec(), &config)
            .await
            .unwrap_err();
        match err {
            BlueprintError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("expected NotAPdf, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn extension_check_is_case_insensitive() {
        let config = ServiceConfig::default();
        // Passes the filename gate, fails on magic instead.
        let err = ingest_document("PLAN.PDF", b"nope".to_vec(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BlueprintError::NotAPdf { .. }));
    }
}
