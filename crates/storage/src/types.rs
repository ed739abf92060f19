//! Storage types shared across modules

use serde::{Deserialize, Serialize};

/// A document to embed into a vector collection.
///
/// `source_id` identifies the origin row; upserting the same id again
/// replaces content, metadata and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDocument {
    pub source_id: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub embedding: Vec<f32>,
}

/// A similarity search hit. `score` is cosine similarity (higher is closer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub source_id: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub score: f64,
}

/// Column description read from `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<i32>,
    pub nullable: bool,
}
