use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{ScoredDocument, VectorDocument};

/// Named collections of embedded documents.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if missing and return its id.
    async fn ensure_collection(&self, name: &str) -> Result<Uuid, StorageError>;

    /// Insert or replace documents keyed by `source_id`. Returns rows written.
    async fn upsert_documents(
        &self,
        collection: &str,
        documents: &[VectorDocument],
    ) -> Result<u64, StorageError>;

    /// Nearest documents by cosine distance, best first.
    ///
    /// An unknown collection or an empty query vector yields no results.
    async fn similarity_search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, StorageError>;

    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError>;

    /// Drop a collection and its documents. Returns whether it existed.
    async fn delete_collection(&self, name: &str) -> Result<bool, StorageError>;
}
