//! Prompt templates.
//!
//! Placeholders use `{name}` and are filled in a single pass, so braces inside
//! substituted values are never expanded.

/// Instructions for the SQL agent. Placeholders: `{dialect}`, `{top_k}`.
pub const SQL_PREFIX: &str = "You are an agent designed to interact with a SQL database.
Given an input question, create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most {top_k} results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the relevant columns given the question.
You have access to tools for interacting with the database.
Only use the below tools. Only use the information returned by the below tools to construct your final answer.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.

DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.

If the question does not seem related to the database, just return \"I don't know\" as the answer.";

/// First thought the SQL agent starts from.
pub const SQL_INITIAL_THOUGHT: &str = "I should look at the tables in the database to see what I can query. Then I should query the schema of the most relevant tables.";

/// Instructions for the hybrid SQL + retrieval agent.
pub const HYBRID_PREFIX: &str = "You are an AI assistant with access to two kinds of tools:
1. SQL tools: Use these for structured queries, counting, filtering, and aggregation.
2. RAG Tool: Use this for general questions about the data.
Based on the user's input, choose the most appropriate tool to provide a detailed response.";

/// ReAct format instructions. Placeholder: `{tool_names}`.
pub const FORMAT_INSTRUCTIONS: &str = "Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question";

/// Query checker prompt. Placeholders: `{query}`, `{dialect}`.
pub const QUERY_CHECKER: &str = "{query}
Double check the {dialect} query above for common mistakes, including:
- Using NOT IN with NULL values
- Using UNION when UNION ALL should have been used
- Using BETWEEN for exclusive ranges
- Data type mismatch in predicates
- Properly quoting identifiers
- Using the correct number of arguments for functions
- Casting to the correct data type
- Using the proper columns for joins

If there are any of the above mistakes, rewrite the query. If there are no mistakes, just reproduce the original query.

Output the final SQL query only.

SQL Query: ";

/// "Stuff" retrieval QA prompt. Placeholders: `{context}`, `{question}`.
pub const RETRIEVAL_QA: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

/// Fill `{key}` placeholders. Unknown keys are left untouched.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter().find(|(k, _)| *k == key).map(|(_, value)| (close, *value))
        });
        match filled {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            },
            None => {
                out.push('{');
                rest = after;
            },
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sql_prefix() {
        let text = render(SQL_PREFIX, &[("dialect", "postgresql"), ("top_k", "10")]);
        assert!(text.contains("syntactically correct postgresql query"));
        assert!(text.contains("at most 10 results"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{a} {b}", &[("a", "x")]), "x {b}");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_in_values() {
        let text = render(
            QUERY_CHECKER,
            &[("query", "SELECT '{dialect}' AS d"), ("dialect", "postgresql")],
        );
        assert!(text.starts_with("SELECT '{dialect}' AS d\nDouble check the postgresql query"));

        let text = render(
            RETRIEVAL_QA,
            &[("context", "note: {question} is literal"), ("question", "Who?")],
        );
        assert!(text.contains("note: {question} is literal"));
        assert!(text.ends_with("Question: Who?\nHelpful Answer:"));
    }

    #[test]
    fn test_render_keeps_stray_braces() {
        assert_eq!(render("{ {a}} {", &[("a", "x")]), "{ x} {");
    }

    #[test]
    fn test_query_checker_ends_with_cue() {
        let text = render(QUERY_CHECKER, &[("query", "SELECT 1"), ("dialect", "postgresql")]);
        assert!(text.starts_with("SELECT 1\nDouble check the postgresql query"));
        assert!(text.ends_with("SQL Query: "));
    }
}
