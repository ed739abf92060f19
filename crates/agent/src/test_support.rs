//! In-memory fakes and a scripted chat endpoint for agent tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ollama_db_core::Employee;
use ollama_db_embeddings::{EmbeddingError, EmbeddingProvider};
use ollama_db_llm::LlmClient;
use ollama_db_storage::{
    EmployeeStore, ScoredDocument, SqlDatabase, StorageError, VectorDocument, VectorStore,
};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub(crate) fn llm_client(base_url: &str) -> Arc<LlmClient> {
    Arc::new(
        LlmClient::new("ollama".to_owned(), base_url.to_owned())
            .unwrap()
            .with_model("gemma".to_owned()),
    )
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

/// Replies with the scripted completions in order, repeating the last one.
struct ScriptedReplies {
    replies: Vec<String>,
    next: AtomicUsize,
}

impl Respond for ScriptedReplies {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.get(i).or_else(|| self.replies.last()).cloned().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(chat_body(&reply))
    }
}

/// Mock chat-completions server answering from a fixed script.
pub(crate) struct ScriptedLlm {
    server: MockServer,
}

impl ScriptedLlm {
    pub(crate) async fn start(replies: Vec<&str>) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ScriptedReplies {
                replies: replies.into_iter().map(str::to_owned).collect(),
                next: AtomicUsize::new(0),
            })
            .mount(&server)
            .await;
        Self { server }
    }

    pub(crate) fn client(&self) -> Arc<LlmClient> {
        llm_client(&self.server.uri())
    }

    /// Request bodies received so far, in order.
    pub(crate) async fn requests(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// The user prompt of every request, in order.
    pub(crate) async fn prompts(&self) -> Vec<String> {
        self.requests()
            .await
            .iter()
            .map(|body| body["messages"][0]["content"].as_str().unwrap_or_default().to_owned())
            .collect()
    }
}

/// Single `employees` table with a canned answer for any SELECT.
pub(crate) struct FakeSqlDatabase {
    tables: Vec<String>,
    rows: String,
}

impl FakeSqlDatabase {
    pub(crate) fn employees() -> Self {
        Self { tables: vec!["employees".to_owned()], rows: "[{\"count\":3}]".to_owned() }
    }
}

#[async_trait]
impl SqlDatabase for FakeSqlDatabase {
    fn dialect(&self) -> &str {
        "postgresql"
    }

    async fn list_tables(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.tables.clone())
    }

    async fn table_info(&self, tables: &[String]) -> Result<String, StorageError> {
        let missing: Vec<String> =
            tables.iter().filter(|t| !self.tables.contains(t)).cloned().collect();
        if !missing.is_empty() {
            return Err(StorageError::UnknownTables(missing));
        }
        Ok(tables
            .iter()
            .map(|t| format!("CREATE TABLE {t} (\n\tid INTEGER NOT NULL\n)"))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    async fn run_query(&self, sql: &str) -> Result<String, StorageError> {
        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            Ok(self.rows.clone())
        } else {
            Err(StorageError::InvalidQuery("only read-only SELECT queries are allowed".to_owned()))
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeEmployeeStore {
    pub employees: Vec<Employee>,
}

#[async_trait]
impl EmployeeStore for FakeEmployeeStore {
    async fn insert_employees(&self, employees: &[Employee]) -> Result<u64, StorageError> {
        Ok(employees.len() as u64)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StorageError> {
        Ok(self.employees.clone())
    }

    async fn count_employees(&self) -> Result<u64, StorageError> {
        Ok(self.employees.len() as u64)
    }
}

/// Collections keyed by name, documents keyed by `source_id`.
#[derive(Default)]
pub(crate) struct FakeVectorStore {
    collections: Mutex<HashMap<String, Vec<VectorDocument>>>,
}

impl FakeVectorStore {
    pub(crate) fn documents(&self, collection: &str) -> Vec<VectorDocument> {
        self.collections.lock().unwrap().get(collection).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl VectorStore for FakeVectorStore {
    async fn ensure_collection(&self, name: &str) -> Result<Uuid, StorageError> {
        self.collections.lock().unwrap().entry(name.to_owned()).or_default();
        Ok(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        documents: &[VectorDocument],
    ) -> Result<u64, StorageError> {
        let mut collections = self.collections.lock().unwrap();
        let stored = collections.entry(collection.to_owned()).or_default();
        for doc in documents {
            stored.retain(|d| d.source_id != doc.source_id);
            stored.push(doc.clone());
        }
        Ok(documents.len() as u64)
    }

    async fn similarity_search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, StorageError> {
        let mut hits: Vec<ScoredDocument> = self
            .documents(collection)
            .into_iter()
            .map(|d| ScoredDocument {
                score: cosine(&d.embedding, embedding),
                source_id: d.source_id,
                content: d.content,
                metadata: d.metadata,
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError> {
        Ok(self.documents(collection).len() as u64)
    }

    async fn delete_collection(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.collections.lock().unwrap().remove(name).is_some())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 { 0.0 } else { f64::from(dot / denom) }
}

const VOCABULARY: [&str; 6] = ["project", "manager", "engineer", "analyst", "designer", "salary"];

/// Counts vocabulary words, so related texts land close together.
pub(crate) struct FakeEmbeddings;

#[async_trait]
impl EmbeddingProvider for FakeEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                VOCABULARY.iter().map(|w| lower.matches(w).count() as f32).collect()
            })
            .collect())
    }

    fn model(&self) -> &str {
        "fake-embed"
    }
}
