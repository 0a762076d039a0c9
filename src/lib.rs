//! # blueprint-chat
//!
//! Chat with construction drawings: upload a PDF drawing set, ask questions,
//! get answers grounded in the sheets themselves.
//!
//! ## Why this crate?
//!
//! Construction PDFs are mostly pictures. Dimension strings, room labels,
//! and material callouts live on the drawing, not in a text layer a plain
//! extractor can reach. This crate rasterises each sheet into a PNG and lets
//! a vision model read it as an estimator would, while cheap lexical
//! analysis (classification, metadata extraction, relevance ranking) keeps
//! the expensive model calls down to the few pages that matter.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Ingest    validate, rasterise pages via pdfium (spawn_blocking)
//!  ├─ 2. Classify  keyword rules → drawing type per page
//!  ├─ 3. Extract   measurements, rooms, materials, symbols, notes
//!  ├─ 4. Store     in-memory, write-once Arc<Document>
//!  ╎
//!  ╎  per question
//!  ├─ 5. Rank      lexical scoring → top 3 relevant pages
//!  └─ 6. Answer    vision model call → ChatResult + confidence
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blueprint_chat::{serve, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = ServiceConfig::default();
//!     serve("127.0.0.1:8000", config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `blueprint-chat` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! blueprint-chat = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod store;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::BlueprintError;
pub use pipeline::answer::{ProviderVisionModel, VisionModel};
pub use server::{router, AppState};
pub use store::DocumentStore;
pub use types::{
    ChatRequest, ChatResult, Document, DocumentPages, Page, PageMetadata, PageSummary, PageType,
    Source, UploadReceipt,
};

use std::sync::Arc;
use tracing::info;

/// Resolve the provider, build the router, and serve until shutdown.
///
/// Provider resolution happens here, before binding, so a missing API key is
/// a startup error rather than a surprise on the first chat request.
pub async fn serve(addr: &str, config: ServiceConfig) -> Result<(), BlueprintError> {
    let provider = pipeline::answer::resolve_provider(&config)?;
    let state = AppState {
        store: Arc::new(DocumentStore::new()),
        model: Arc::new(ProviderVisionModel::new(provider)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BlueprintError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| BlueprintError::Internal(format!("Server error: {}", e)))
}
