//! Typed error enum for the embeddings crate.

use thiserror::Error;

/// Errors from embedding generation operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding client initialization failed: {0}")]
    ClientInit(String),
    #[error("embedding request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("embedding server returned HTTP {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("embedding generation returned empty result")]
    EmptyResult,
    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}
