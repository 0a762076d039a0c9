//! In-memory document store.
//!
//! Documents live for the lifetime of the process; there is no eviction and
//! no persistence. Handlers hold an `Arc<Document>` snapshot across a whole
//! chat request, so a concurrent upload can never mutate pages out from
//! under an in-flight answer.

use crate::error::BlueprintError;
use crate::types::Document;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Process-lifetime store keyed by document id.
#[derive(Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, Arc<Document>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly ingested document.
    pub async fn insert(&self, document: Document) -> Arc<Document> {
        let document = Arc::new(document);
        let mut documents = self.documents.write().await;
        documents.insert(document.id.clone(), Arc::clone(&document));
        info!(document_id = %document.id, total = documents.len(), "document stored");
        document
    }

    /// Fetch a document by id.
    pub async fn get(&self, id: &str) -> Result<Arc<Document>, BlueprintError> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| BlueprintError::DocumentNotFound { id: id.to_string() })
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn document(id: &str) -> Document {
        Document {
            id: id.to_string(),
            filename: "plans.pdf".to_string(),
            pages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = DocumentStore::new();
        store.insert(document("a")).await;
        let fetched = store.get("a").await.unwrap();
        assert_eq!(fetched.filename, "plans.pdf");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = DocumentStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert!(matches!(err, BlueprintError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn get_returns_shared_snapshot() {
        let store = DocumentStore::new();
        store.insert(document("a")).await;
        let one = store.get("a").await.unwrap();
        let two = store.get("a").await.unwrap();
        assert!(Arc::ptr_eq(&one, &two));
    }
}
