use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::react::{MISSING_ACTION, MISSING_ACTION_INPUT};
use crate::test_support::{FakeEmbeddings, FakeSqlDatabase, FakeVectorStore, ScriptedLlm};
use crate::{
    AgentError, AgentExecutor, AgentOptions, RagTool, RetrievalQa, STOPPED_OUTPUT, SqlToolkit,
    Tool, create_hybrid_agent, create_sql_agent,
};
use ollama_db_core::MAX_TOOL_OUTPUT_LEN;
use ollama_db_storage::StorageError;

struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Repeats the input."
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        Ok(input.to_owned())
    }
}

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails."
    }

    async fn call(&self, _input: &str) -> Result<String, AgentError> {
        Err(StorageError::InvalidQuery("tool exploded".to_owned()).into())
    }
}

fn echo_agent(llm: &ScriptedLlm, options: AgentOptions) -> AgentExecutor {
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(EchoTool), Arc::new(FailingTool)];
    AgentExecutor::new(llm.client(), tools, "You are a test agent.", options)
}

#[tokio::test]
async fn test_sql_agent_lists_tables_queries_and_answers() {
    let llm = ScriptedLlm::start(vec![
        " I should list the tables.\nAction: sql_db_list_tables\nAction Input: ",
        " Count the rows.\nAction: sql_db_query\nAction Input: \"SELECT COUNT(*) FROM employees\"",
        " I now know the final answer\nFinal Answer: There are 3 employees.",
    ])
    .await;
    let toolkit = SqlToolkit::new(Arc::new(FakeSqlDatabase::employees()), llm.client());
    let agent = create_sql_agent(llm.client(), &toolkit, AgentOptions::default());

    let response = agent.invoke("How many employees are there?").await.unwrap();
    assert_eq!(response.input, "How many employees are there?");
    assert_eq!(response.output, "There are 3 employees.");
    assert_eq!(response.intermediate_steps.len(), 2);
    assert_eq!(response.intermediate_steps[0].observation, "employees");
    assert_eq!(response.intermediate_steps[1].tool_input, "SELECT COUNT(*) FROM employees");
    assert_eq!(response.intermediate_steps[1].observation, "[{\"count\":3}]");

    let requests = llm.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0]["stop"][0], "\nObservation:");

    let prompts = llm.prompts().await;
    assert!(prompts[0].starts_with("You are an agent designed to interact with a SQL database."));
    assert!(prompts[0].contains("syntactically correct postgresql query"));
    assert!(prompts[0].contains("at most 10 results"));
    assert!(prompts[0].contains("sql_db_query_checker: Use this tool to double check"));
    assert!(prompts[0].contains(
        "should be one of [sql_db_query, sql_db_schema, sql_db_list_tables, sql_db_query_checker]"
    ));
    assert!(prompts[0].ends_with(
        "Question: How many employees are there?\nThought: I should look at the tables in the \
         database to see what I can query. Then I should query the schema of the most relevant \
         tables.\n"
    ));
    assert!(prompts[1].ends_with(
        "Action: sql_db_list_tables\nAction Input: \nObservation: employees\nThought: "
    ));
}

#[tokio::test]
async fn test_prompt_without_initial_thought_continues_on_same_line() {
    let llm = ScriptedLlm::start(vec!["Final Answer: hi"]).await;
    let agent = echo_agent(&llm, AgentOptions::default());
    assert_eq!(agent.run("Say hi").await.unwrap(), "hi");

    let prompts = llm.prompts().await;
    assert!(prompts[0].starts_with("You are a test agent.\n\necho: Repeats the input.\nbroken: Always fails.\n\n"));
    assert!(prompts[0].ends_with("Begin!\n\nQuestion: Say hi\nThought:"));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_model() {
    let llm = ScriptedLlm::start(vec![
        "Action: calculator\nAction Input: 2+2",
        "Final Answer: 4",
    ])
    .await;
    let response = echo_agent(&llm, AgentOptions::default()).invoke("2+2?").await.unwrap();
    assert_eq!(response.output, "4");
    assert_eq!(
        response.intermediate_steps[0].observation,
        "calculator is not a valid tool, try one of [echo, broken]."
    );
}

#[tokio::test]
async fn test_tool_error_becomes_observation() {
    let llm = ScriptedLlm::start(vec!["Action: broken\nAction Input: x", "Final Answer: gave up"])
        .await;
    let response = echo_agent(&llm, AgentOptions::default()).invoke("try").await.unwrap();
    assert_eq!(
        response.intermediate_steps[0].observation,
        "Error: storage: invalid query: tool exploded"
    );
    assert!(
        llm.prompts().await[1].contains("Observation: Error: storage: invalid query: tool exploded")
    );
}

#[tokio::test]
async fn test_parse_errors_are_fed_back_when_handled() {
    let llm = ScriptedLlm::start(vec![
        "I think I know",
        "Thought: use echo\nAction: echo",
        "Final Answer: done",
    ])
    .await;
    let response = echo_agent(&llm, AgentOptions::default()).invoke("q").await.unwrap();
    assert_eq!(response.output, "done");
    let steps = &response.intermediate_steps;
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].tool, "_Exception");
    assert_eq!(steps[0].observation, MISSING_ACTION);
    assert_eq!(steps[1].observation, MISSING_ACTION_INPUT);
    assert!(llm.prompts().await[1].ends_with(&format!(
        "I think I know\nObservation: {MISSING_ACTION}\nThought: "
    )));
}

#[tokio::test]
async fn test_parse_errors_fail_when_not_handled() {
    let llm = ScriptedLlm::start(vec!["no format at all"]).await;
    let options = AgentOptions { handle_parsing_errors: false, ..AgentOptions::default() };
    let err = echo_agent(&llm, options).invoke("q").await.unwrap_err();
    assert!(matches!(err, AgentError::OutputParse { .. }));
    assert!(err.to_string().contains("no format at all"));
}

#[tokio::test]
async fn test_iteration_limit_stops_agent() {
    let llm = ScriptedLlm::start(vec!["Action: echo\nAction Input: again"]).await;
    let options = AgentOptions { max_iterations: 2, ..AgentOptions::default() };
    let response = echo_agent(&llm, options).invoke("loop").await.unwrap();
    assert_eq!(response.output, STOPPED_OUTPUT);
    assert_eq!(response.intermediate_steps.len(), 2);
    assert_eq!(llm.requests().await.len(), 2);
}

#[tokio::test]
async fn test_time_limit_stops_before_first_call() {
    let llm = ScriptedLlm::start(vec!["Final Answer: never"]).await;
    let options =
        AgentOptions { max_execution_time: Some(Duration::ZERO), ..AgentOptions::default() };
    let response = echo_agent(&llm, options).invoke("q").await.unwrap();
    assert_eq!(response.output, STOPPED_OUTPUT);
    assert!(llm.requests().await.is_empty());
}

#[tokio::test]
async fn test_long_observation_is_truncated() {
    let long_input = "y".repeat(MAX_TOOL_OUTPUT_LEN + 500);
    let first = format!("Action: echo\nAction Input: {long_input}");
    let llm = ScriptedLlm::start(vec![first.as_str(), "Final Answer: ok"]).await;
    let response = echo_agent(&llm, AgentOptions::default()).invoke("q").await.unwrap();
    assert_eq!(response.intermediate_steps[0].observation.len(), MAX_TOOL_OUTPUT_LEN);
}

#[tokio::test]
async fn test_hybrid_agent_routes_to_rag_tool() {
    let llm = ScriptedLlm::start(vec![
        "Action: RAG Tool\nAction Input: What is the role of a Project Manager?",
        "A Project Manager plans schedules.",
        "Final Answer: A Project Manager plans schedules.",
    ])
    .await;
    let toolkit = SqlToolkit::new(Arc::new(FakeSqlDatabase::employees()), llm.client());
    let rag = RagTool::new(RetrievalQa::new(
        Arc::new(FakeEmbeddings),
        Arc::new(FakeVectorStore::default()),
        "employees",
        llm.client(),
    ));
    let agent = create_hybrid_agent(llm.client(), &toolkit, rag, AgentOptions::default());
    assert_eq!(
        agent.tool_names(),
        ["sql_db_query", "sql_db_schema", "sql_db_list_tables", "sql_db_query_checker", "RAG Tool"]
    );

    let response = agent.invoke("What is the role of a Project Manager?").await.unwrap();
    assert_eq!(response.output, "A Project Manager plans schedules.");
    assert_eq!(response.intermediate_steps[0].observation, "A Project Manager plans schedules.");

    let prompts = llm.prompts().await;
    assert!(prompts[0].starts_with("You are an AI assistant with access to two kinds of tools:"));
    assert!(prompts[0].contains("RAG Tool: Useful for general knowledge questions about the data."));
    assert!(prompts[1].starts_with("Use the following pieces of context"));
}
