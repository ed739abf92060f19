use std::sync::Arc;

use anyhow::Result;
use ollama_db_agent::{
    AgentExecutor, AgentOptions, RagTool, RetrievalQa, SqlToolkit, create_hybrid_agent,
    create_sql_agent,
};
use ollama_db_core::{DbConfig, OllamaConfig};
use ollama_db_embeddings::OllamaEmbeddings;
use ollama_db_llm::LlmClient;
use ollama_db_storage::PgStorage;

pub(crate) const SQL_AGENT_QUESTIONS: [&str; 3] = [
    "How many employees are in the 'employees' table?",
    "Show me the names of the top 3 employees by salary from the 'employees' table.",
    "What is the average salary in the 'employees' table?",
];

pub(crate) const HYBRID_QUESTIONS: [&str; 2] =
    ["How many employees are there?", "What is the role of a Project Manager?"];

/// Works against any PostgreSQL database; the schema is never modified.
pub(crate) async fn run_sql_agent(
    db: &DbConfig,
    ollama: &OllamaConfig,
    questions: Vec<String>,
    options: AgentOptions,
) -> Result<()> {
    let storage = Arc::new(PgStorage::connect(db).await?);
    let llm = llm_client(ollama)?;
    let toolkit = SqlToolkit::new(storage, llm.clone());
    let agent = create_sql_agent(llm, &toolkit, options);
    ask_all(&agent, &with_defaults(questions, &SQL_AGENT_QUESTIONS)).await
}

/// Expects `index` to have built the collection; nothing is created here.
pub(crate) async fn run_hybrid(
    db: &DbConfig,
    ollama: &OllamaConfig,
    questions: Vec<String>,
    options: AgentOptions,
    collection: &str,
) -> Result<()> {
    let storage = Arc::new(PgStorage::connect(db).await?);
    let llm = llm_client(ollama)?;
    let embeddings = Arc::new(OllamaEmbeddings::new(&ollama.base_url, &ollama.embed_model)?);

    let toolkit = SqlToolkit::new(storage.clone(), llm.clone());
    let rag = RagTool::new(RetrievalQa::new(embeddings, storage, collection, llm.clone()));
    let agent = create_hybrid_agent(llm, &toolkit, rag, options);
    ask_all(&agent, &with_defaults(questions, &HYBRID_QUESTIONS)).await
}

fn llm_client(ollama: &OllamaConfig) -> Result<Arc<LlmClient>> {
    let client = LlmClient::new(ollama.api_key.clone(), ollama.base_url.clone())?
        .with_model(ollama.chat_model.clone());
    tracing::info!(model = client.model(), base_url = client.base_url(), "LLM client ready");
    Ok(Arc::new(client))
}

fn with_defaults(questions: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if questions.is_empty() {
        defaults.iter().map(|q| (*q).to_owned()).collect()
    } else {
        questions
    }
}

/// Questions run one after another; the first failure aborts the rest.
async fn ask_all(agent: &AgentExecutor, questions: &[String]) -> Result<()> {
    for question in questions {
        println!("\nUser: {question}");
        let response = agent.run(question).await?;
        println!("\nLLM Response:\n{response}");
    }
    Ok(())
}
