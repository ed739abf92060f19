//! Typed error enum for the LLM crate.

use thiserror::Error;

/// Failures talking to the Ollama chat endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Non-success status; `body` usually carries Ollama's reason (e.g. model not pulled).
    #[error("chat endpoint returned HTTP {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("could not parse {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("chat response contained no choices")]
    EmptyResponse,
    #[error("LLM client initialization failed: {0}")]
    ClientInit(String),
    #[error("giving up after retries: {0}")]
    RetriesExhausted(Box<LlmError>),
}

impl LlmError {
    /// Transport failures and 429/5xx overload statuses are worth another attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 529),
            Self::RetriesExhausted(_)
            | Self::JsonParse { .. }
            | Self::EmptyResponse
            | Self::ClientInit(_) => false,
        }
    }
}
