//! Embeds employee rows into a vector collection for retrieval.

use std::sync::Arc;

use ollama_db_core::{DEFAULT_EMBED_BATCH_SIZE, EMPLOYEES_COLLECTION};
use ollama_db_embeddings::{EmbeddingError, EmbeddingProvider};
use ollama_db_storage::{EmployeeStore, VectorDocument, VectorStore};

use crate::AgentError;

pub struct EmployeeIndexer {
    employees: Arc<dyn EmployeeStore>,
    vectors: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl EmployeeIndexer {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        vectors: Arc<dyn VectorStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self { employees, vectors, embeddings, collection: EMPLOYEES_COLLECTION.to_owned() }
    }

    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Embed every employee and upsert one document per row.
    ///
    /// Returns the number of employees indexed. Documents are keyed by
    /// employee id, so running this again replaces instead of duplicating.
    pub async fn index(&self) -> Result<usize, AgentError> {
        let employees = self.employees.list_employees().await?;
        self.vectors.ensure_collection(&self.collection).await?;
        if employees.is_empty() {
            tracing::warn!(collection = %self.collection, "no employees to index");
            return Ok(0);
        }

        for chunk in employees.chunks(DEFAULT_EMBED_BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(|e| e.document_text()).collect();
            let vectors = self.embeddings.embed_documents(&texts).await?;
            if vectors.len() != chunk.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: chunk.len(),
                    actual: vectors.len(),
                }
                .into());
            }
            let documents: Vec<VectorDocument> = chunk
                .iter()
                .zip(texts)
                .zip(vectors)
                .map(|((employee, content), embedding)| VectorDocument {
                    source_id: employee.id.to_string(),
                    content,
                    metadata: employee.metadata(),
                    embedding,
                })
                .collect();
            self.vectors.upsert_documents(&self.collection, &documents).await?;
        }

        tracing::info!(
            collection = %self.collection,
            count = employees.len(),
            model = self.embeddings.model(),
            "employees indexed"
        );
        Ok(employees.len())
    }
}
