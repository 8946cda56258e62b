// Document store seam
// Handlers only ever talk to `DocumentStore`; the backend is chosen at startup.

pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    db::Database,
    error::ApiError,
    models::JsonDocument,
};

pub use memory::MemoryStore;

/// Insert-one and find-all over a single collection of opaque JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores the document unmodified. Duplicates are kept.
    async fn insert_document(&self, document: JsonDocument) -> Result<(), ApiError>;

    /// Returns every stored document in insertion order, without the
    /// identifier field. Unbounded.
    async fn find_all_documents(&self) -> Result<Vec<JsonDocument>, ApiError>;

    /// Round-trip to the backend used by `/health`.
    async fn health_check(&self) -> Result<(), ApiError>;

    /// Releases backend resources. Called once after the server has drained.
    async fn shutdown(&self);
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// Opens the backend selected by `STORAGE_BACKEND`.
pub async fn connect(config: &Config) -> Result<SharedStore, ApiError> {
    match config.backend {
        StorageBackend::MongoDb => Ok(Arc::new(Database::new(&config.mongodb).await?)),
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; documents are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
