//! Embedding generation for semantic search
//!
//! Embeddings come from a local Ollama server (`/api/embed`). Callers depend on
//! [`EmbeddingProvider`] so tests can swap in deterministic vectors.

pub mod error;
mod ollama;

use async_trait::async_trait;

pub use error::EmbeddingError;
pub use ollama::OllamaEmbeddings;

/// Turns text into dense vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed many texts. The result has one vector per input, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_documents(&[text.to_owned()]).await?;
        vectors.pop().ok_or(EmbeddingError::EmptyResult)
    }

    /// Model name, recorded with stored documents.
    fn model(&self) -> &str;
}
