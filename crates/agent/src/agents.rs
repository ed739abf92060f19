//! Ready-made agents: SQL-only and hybrid SQL + retrieval.

use std::sync::Arc;

use ollama_db_llm::LlmClient;

use crate::prompts::{HYBRID_PREFIX, SQL_INITIAL_THOUGHT, SQL_PREFIX, render};
use crate::{AgentExecutor, AgentOptions, RagTool, SqlToolkit, Tool};

/// Agent that answers by exploring and querying the toolkit's database.
pub fn create_sql_agent(
    llm: Arc<LlmClient>,
    toolkit: &SqlToolkit,
    options: AgentOptions,
) -> AgentExecutor {
    let top_k = options.top_k.to_string();
    let prefix = render(SQL_PREFIX, &[("dialect", toolkit.dialect()), ("top_k", &top_k)]);
    AgentExecutor::new(llm, toolkit.tools(), prefix, options)
        .with_initial_thought(SQL_INITIAL_THOUGHT)
}

/// Agent that picks between the SQL tools and semantic retrieval per question.
pub fn create_hybrid_agent(
    llm: Arc<LlmClient>,
    toolkit: &SqlToolkit,
    rag_tool: RagTool,
    options: AgentOptions,
) -> AgentExecutor {
    let mut tools = toolkit.tools();
    tools.push(Arc::new(rag_tool) as Arc<dyn Tool>);
    AgentExecutor::new(llm, tools, HYBRID_PREFIX, options)
}
