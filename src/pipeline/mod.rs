//! The document-chat pipeline, one stage per module.
//!
//! ```text
//!                     ┌─────────┐
//!  uploaded PDF ────▶ │ ingest  │──▶ pages (text + PNG per page)
//!                     └─────────┘
//!                          │  per page
//!                ┌─────────┴─────────┐
//!                ▼                   ▼
//!           ┌──────────┐       ┌─────────┐
//!           │ classify │       │ extract │
//!           └──────────┘       └─────────┘
//!            drawing type       metadata
//!                          │
//!                          ▼   stored Document
//!                     ┌─────────┐
//!  question ────────▶ │  rank   │──▶ top relevant pages
//!                     └─────────┘
//!                          │
//!                          ▼
//!                     ┌─────────┐
//!                     │ answer  │──▶ ChatResult
//!                     └─────────┘
//! ```
//!
//! Ingestion runs the left column once per upload; every chat request runs
//! rank and answer against the stored document. Each stage is independently
//! testable; classify, extract, and rank are pure functions.

pub mod answer;
pub mod classify;
pub mod extract;
pub mod ingest;
pub mod rank;
