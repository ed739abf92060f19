//! Retrieval QA over a vector collection, and the tool wrapping it.

use std::sync::Arc;

use async_trait::async_trait;
use ollama_db_core::DEFAULT_RETRIEVER_K;
use ollama_db_embeddings::EmbeddingProvider;
use ollama_db_llm::LlmClient;
use ollama_db_storage::{ScoredDocument, VectorStore};

use crate::prompts::{RETRIEVAL_QA, render};
use crate::{AgentError, Tool};

const RAG_TOOL_NAME: &str = "RAG Tool";
const RAG_TOOL_DESCRIPTION: &str = "Useful for general knowledge questions about the data.";

/// Embed the question, fetch the `k` closest documents, and ask the model
/// with all of them stuffed into one prompt.
#[derive(Clone)]
pub struct RetrievalQa {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    collection: String,
    llm: Arc<LlmClient>,
    k: usize,
}

impl RetrievalQa {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        llm: Arc<LlmClient>,
    ) -> Self {
        Self { embeddings, store, collection: collection.into(), llm, k: DEFAULT_RETRIEVER_K }
    }

    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredDocument>, AgentError> {
        let query = self.embeddings.embed_query(question).await?;
        let docs = self.store.similarity_search(&self.collection, &query, self.k).await?;
        tracing::debug!(collection = %self.collection, hits = docs.len(), "retrieved documents");
        Ok(docs)
    }

    pub async fn answer(&self, question: &str) -> Result<String, AgentError> {
        let docs = self.retrieve(question).await?;
        let context = docs.iter().map(|d| d.content.as_str()).collect::<Vec<_>>().join("\n\n");
        let prompt = render(RETRIEVAL_QA, &[("context", &context), ("question", question)]);
        let answer = self.llm.complete(&prompt, &[]).await?;
        Ok(answer.trim().to_owned())
    }
}

/// [`RetrievalQa`] exposed to the agent as `RAG Tool`.
pub struct RagTool {
    chain: RetrievalQa,
}

impl RagTool {
    pub const fn new(chain: RetrievalQa) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Tool for RagTool {
    fn name(&self) -> &str {
        RAG_TOOL_NAME
    }

    fn description(&self) -> &str {
        RAG_TOOL_DESCRIPTION
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        self.chain.answer(input).await
    }
}
