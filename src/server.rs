//! HTTP facade: axum router, handlers, and the error → status mapping.
//!
//! The handlers are thin; every decision of substance happens in the
//! pipeline modules. State is three `Arc`s, so cloning per request is cheap
//! and the whole router can be rebuilt in tests around a stub model.

use crate::config::ServiceConfig;
use crate::error::BlueprintError;
use crate::pipeline::answer::{self, VisionModel};
use crate::pipeline::{ingest, rank};
use crate::store::DocumentStore;
use crate::types::{ChatRequest, ChatResult, DocumentPages, PageSummary, UploadReceipt};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Uploads above this size are rejected at the transport layer.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub model: Arc<dyn VisionModel>,
    pub config: Arc<ServiceConfig>,
}

/// Build the service router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/upload", post(upload_document))
        .route("/api/chat", post(chat_with_document))
        .route("/api/document/:id/pages", get(document_pages))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────────

/// `POST /api/upload` — multipart upload of one PDF under the `file` field.
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>, BlueprintError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BlueprintError::Internal(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| BlueprintError::Internal(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) = upload.ok_or(BlueprintError::EmptyUpload)?;

    let document = ingest::ingest_document(&filename, bytes, &state.config).await?;
    let document = state.store.insert(document).await;

    Ok(Json(UploadReceipt {
        document_id: document.id.clone(),
        filename: document.filename.clone(),
        status: "processed".to_string(),
        pages_count: document.pages.len(),
        page_types: document.page_types(),
    }))
}

/// `POST /api/chat` — answer a question against a previously uploaded document.
async fn chat_with_document(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResult>, BlueprintError> {
    let document = state.store.get(&request.document_id).await?;

    let relevant = rank::rank_pages(&request.message, &document.pages, state.config.top_pages);
    if relevant.is_empty() {
        return Err(BlueprintError::NoRelevantPages);
    }

    info!(
        document_id = %document.id,
        pages = relevant.len(),
        "answering question"
    );

    let result =
        answer::answer_question(&*state.model, &request.message, &relevant, &state.config).await;

    Ok(Json(result))
}

/// `GET /api/document/{id}/pages` — per-page summaries for inspection.
async fn document_pages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentPages>, BlueprintError> {
    let document = state.store.get(&id).await?;
    let pages = document.pages.iter().map(PageSummary::from_page).collect();
    Ok(Json(DocumentPages { pages }))
}

/// `GET /api/health` — liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "vision_enabled": true }))
}

// ── Error mapping ─────────────────────────────────────────────────────────

impl BlueprintError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlueprintError::UnsupportedFileType { .. }
            | BlueprintError::EmptyUpload
            | BlueprintError::NotAPdf { .. }
            | BlueprintError::CorruptPdf { .. }
            | BlueprintError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            BlueprintError::DocumentNotFound { .. } | BlueprintError::NoRelevantPages => {
                StatusCode::NOT_FOUND
            }
            BlueprintError::RasterisationFailed { .. }
            | BlueprintError::ImageWriteFailed { .. }
            | BlueprintError::ProviderNotConfigured { .. }
            | BlueprintError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BlueprintError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_rejections_are_bad_request() {
        let e = BlueprintError::UnsupportedFileType {
            filename: "plan.docx".into(),
        };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BlueprintError::EmptyUpload.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lookup_misses_are_not_found() {
        let e = BlueprintError::DocumentNotFound { id: "x".into() };
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            BlueprintError::NoRelevantPages.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn infrastructure_failures_are_internal() {
        let e = BlueprintError::RasterisationFailed {
            page: 1,
            detail: "oom".into(),
        };
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
