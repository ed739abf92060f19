//! Agent layer for ollama-db
//!
//! Tools the model can call (SQL toolkit, retrieval QA), the ReAct loop that
//! drives them, and the constructors for the SQL-only and hybrid agents.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]

mod agents;
mod error;
mod executor;
mod indexer;
pub mod prompts;
mod react;
mod retrieval;
mod sql_toolkit;
mod tool;

#[cfg(test)]
mod executor_tests;
#[cfg(test)]
mod test_support;

pub use agents::{create_hybrid_agent, create_sql_agent};
pub use error::AgentError;
pub use executor::{AgentExecutor, AgentOptions, AgentResponse, AgentStep, STOPPED_OUTPUT};
pub use indexer::EmployeeIndexer;
pub use react::{AgentAction, AgentDecision, parse_react_output};
pub use retrieval::{RagTool, RetrievalQa};
pub use sql_toolkit::SqlToolkit;
pub use tool::Tool;
