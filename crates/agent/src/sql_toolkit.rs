//! Tools for exploring and querying a SQL database.

use std::sync::Arc;

use async_trait::async_trait;
use ollama_db_llm::{LlmClient, strip_code_fence};
use ollama_db_storage::SqlDatabase;

use crate::prompts::{QUERY_CHECKER, render};
use crate::{AgentError, Tool};

const QUERY_DESCRIPTION: &str = "Input to this tool is a detailed and correct SQL query, output is a result from the database. If the query is not correct, an error message will be returned. If an error is returned, rewrite the query, check the query, and try again. If you encounter an issue with Unknown column 'xxxx' in 'field list', use sql_db_schema to query the correct table fields.";
const SCHEMA_DESCRIPTION: &str = "Input to this tool is a comma-separated list of tables, output is the schema and sample rows for those tables. Be sure that the tables actually exist by calling sql_db_list_tables first! Example Input: table1, table2, table3";
const LIST_TABLES_DESCRIPTION: &str =
    "Input is an empty string, output is a comma-separated list of tables in the database.";
const QUERY_CHECKER_DESCRIPTION: &str = "Use this tool to double check if your query is correct before executing it. Always use this tool before executing a query with sql_db_query!";

/// The four SQL tools sharing one database handle and one LLM.
#[derive(Clone)]
pub struct SqlToolkit {
    db: Arc<dyn SqlDatabase>,
    llm: Arc<LlmClient>,
}

impl SqlToolkit {
    pub fn new(db: Arc<dyn SqlDatabase>, llm: Arc<LlmClient>) -> Self {
        Self { db, llm }
    }

    #[must_use]
    pub fn dialect(&self) -> &str {
        self.db.dialect()
    }

    /// Tools in the order they are listed to the model.
    #[must_use]
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(QueryTool { db: Arc::clone(&self.db) }),
            Arc::new(SchemaTool { db: Arc::clone(&self.db) }),
            Arc::new(ListTablesTool { db: Arc::clone(&self.db) }),
            Arc::new(QueryCheckerTool { db: Arc::clone(&self.db), llm: Arc::clone(&self.llm) }),
        ]
    }
}

struct QueryTool {
    db: Arc<dyn SqlDatabase>,
}

#[async_trait]
impl Tool for QueryTool {
    fn name(&self) -> &str {
        "sql_db_query"
    }

    fn description(&self) -> &str {
        QUERY_DESCRIPTION
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        Ok(self.db.run_query(input).await.unwrap_or_else(|e| format!("Error: {e}")))
    }
}

struct SchemaTool {
    db: Arc<dyn SqlDatabase>,
}

#[async_trait]
impl Tool for SchemaTool {
    fn name(&self) -> &str {
        "sql_db_schema"
    }

    fn description(&self) -> &str {
        SCHEMA_DESCRIPTION
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        let tables = split_table_names(input);
        Ok(self.db.table_info(&tables).await.unwrap_or_else(|e| format!("Error: {e}")))
    }
}

struct ListTablesTool {
    db: Arc<dyn SqlDatabase>,
}

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &str {
        "sql_db_list_tables"
    }

    fn description(&self) -> &str {
        LIST_TABLES_DESCRIPTION
    }

    async fn call(&self, _input: &str) -> Result<String, AgentError> {
        Ok(self.db.list_tables().await?.join(", "))
    }
}

struct QueryCheckerTool {
    db: Arc<dyn SqlDatabase>,
    llm: Arc<LlmClient>,
}

#[async_trait]
impl Tool for QueryCheckerTool {
    fn name(&self) -> &str {
        "sql_db_query_checker"
    }

    fn description(&self) -> &str {
        QUERY_CHECKER_DESCRIPTION
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        let prompt = render(QUERY_CHECKER, &[("query", input), ("dialect", self.db.dialect())]);
        let checked = self.llm.complete(&prompt, &[]).await?;
        Ok(strip_code_fence(&checked).to_owned())
    }
}

/// `"employees, departments"` -> `["employees", "departments"]`.
fn split_table_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`'))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
