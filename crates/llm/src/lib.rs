//! LLM client for agent reasoning and answer generation
//!
//! Talks to Ollama through its OpenAI-compatible `/v1/chat/completions` route.

mod ai_types;
mod client;
pub mod error;


pub use ai_types::{ChatRequest, Message};
pub use client::{LlmClient, strip_code_fence, truncate};
pub use error::LlmError;
