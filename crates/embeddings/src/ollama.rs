use async_trait::async_trait;
use ollama_db_core::DEFAULT_EMBED_BATCH_SIZE;
use serde::{Deserialize, Serialize};

use crate::{EmbeddingError, EmbeddingProvider};

/// Client for Ollama's `/api/embed` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    base_url: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbeddings {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str, model: &str) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| EmbeddingError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        })
    }

    /// Texts per request; clamped to at least one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&EmbedRequest { model: &self.model, input: batch })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(EmbeddingError::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: EmbedResponse = response.json().await?;
        if parsed.embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: parsed.embeddings.len(),
            });
        }
        if parsed.embeddings.iter().any(Vec::is_empty) {
            return Err(EmbeddingError::EmptyResult);
        }
        Ok(parsed.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
            tracing::debug!(done = vectors.len(), total = texts.len(), "embedded batch");
        }
        Ok(vectors)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_embed_query_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({ "model": "nomic-embed-text", "input": ["hello"] })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[0.1, 0.2, 0.3]] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaEmbeddings::new(&server.uri(), "nomic-embed-text").unwrap();
        let vector = client.embed_query("hello").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_documents_batches_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({ "input": ["a", "b"] })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[1.0], [2.0]] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({ "input": ["c"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[3.0]] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaEmbeddings::new(&server.uri(), "m").unwrap().with_batch_size(2);
        let texts = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let vectors = client.embed_documents(&texts).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0], vec![2.0], vec![3.0]]);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [] })))
            .mount(&server)
            .await;

        let client = OllamaEmbeddings::new(&server.uri(), "m").unwrap();
        let err = client.embed_documents(&["x".to_owned()]).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::CountMismatch { expected: 1, actual: 0 }));
    }

    #[tokio::test]
    async fn test_http_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let client = OllamaEmbeddings::new(&format!("{}/", server.uri()), "missing").unwrap();
        let err = client.embed_query("x").await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

        let client = OllamaEmbeddings::new(&server.uri(), "m").unwrap();
        assert!(client.embed_documents(&[]).await.unwrap().is_empty());
        assert_eq!(client.model(), "m");
    }
}
