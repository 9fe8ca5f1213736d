//! services/api/src/adapters/store.rs
//!
//! The in-memory document store. Saved documents live for the lifetime of the
//! process only; there is deliberately no disk or remote persistence.

use async_trait::async_trait;
use tokio::sync::Mutex;
use writing_assistant_core::domain::SavedDocument;
use writing_assistant_core::ports::{DocumentStore, PortResult};

/// An append-only, process-lifetime implementation of the `DocumentStore` port.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<Vec<SavedDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, document: SavedDocument) -> PortResult<SavedDocument> {
        let mut documents = self.documents.lock().await;
        documents.push(document.clone());
        Ok(document)
    }

    async fn list(&self) -> PortResult<Vec<SavedDocument>> {
        Ok(self.documents.lock().await.clone())
    }
}
