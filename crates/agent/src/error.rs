//! Typed error enum for the agent layer.
//!
//! Unifies storage, LLM, and embedding failures plus model output that does
//! not follow the ReAct format.

use ollama_db_embeddings::EmbeddingError;
use ollama_db_llm::LlmError;
use ollama_db_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Storage operation failed (DB, unknown table, rejected query).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// LLM API call failed.
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// Embedding generation failed.
    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Model output did not follow the expected format.
    ///
    /// `observation` is what gets fed back to the model when parsing errors
    /// are handled instead of raised.
    #[error("{message}")]
    OutputParse { message: String, observation: String },
}
