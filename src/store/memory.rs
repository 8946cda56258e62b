use async_trait::async_trait;
use mongodb::bson::Document as BsonDocument;
use tokio::sync::RwLock;
use tracing::info;

use super::DocumentStore;
use crate::{
    error::ApiError,
    models::{
        document::{from_bson, to_bson},
        JsonDocument,
    },
};

/// Non-persistent backend kept in process memory.
/// Documents go through the same BSON conversion as the MongoDB backend, so
/// both accept and return exactly the same data.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<BsonDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, document: JsonDocument) -> Result<(), ApiError> {
        let stored = to_bson(&document)?;
        self.documents.write().await.push(stored);
        Ok(())
    }

    async fn find_all_documents(&self) -> Result<Vec<JsonDocument>, ApiError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().cloned().map(from_bson).collect())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn shutdown(&self) {
        let count = self.len().await;
        info!("Discarding {} in-memory documents", count);
    }
}
