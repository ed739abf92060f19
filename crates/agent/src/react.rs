//! Parser for ReAct-style model output.
//!
//! The model either names a tool (`Action:` / `Action Input:`) or gives a
//! `Final Answer:`. Anything else is a format error the executor can feed
//! back to the model.

use std::sync::LazyLock;

use regex::Regex;

use crate::AgentError;

const FINAL_ANSWER: &str = "Final Answer:";

pub(crate) const MISSING_ACTION: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";
pub(crate) const MISSING_ACTION_INPUT: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";
pub(crate) const INVALID_RESPONSE: &str = "Invalid or incomplete response";
const ANSWER_AND_ACTION: &str =
    "Parsing LLM output produced both a final answer and a parse-able action:";

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static ACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .unwrap()
});

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static ACTION_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)").unwrap());

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static ACTION_INPUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)").unwrap());

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// Raw model output, replayed in the scratchpad.
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    Action(AgentAction),
    Finish { output: String, log: String },
}

/// Parse one model completion into an action or a final answer.
pub fn parse_react_output(text: &str) -> Result<AgentDecision, AgentError> {
    let includes_answer = text.contains(FINAL_ANSWER);

    if let Some(caps) = ACTION_REGEX.captures(text) {
        if includes_answer {
            return Err(parse_error(format!("{ANSWER_AND_ACTION} {text}"), INVALID_RESPONSE));
        }
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim().to_owned();
        let tool_input = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .trim_matches(' ')
            .trim_matches('"')
            .to_owned();
        return Ok(AgentDecision::Action(AgentAction { tool, tool_input, log: text.to_owned() }));
    }

    if includes_answer {
        let output = text.rsplit(FINAL_ANSWER).next().unwrap_or_default().trim().to_owned();
        return Ok(AgentDecision::Finish { output, log: text.to_owned() });
    }

    let message = format!("Could not parse LLM output: `{text}`");
    if !ACTION_LINE_REGEX.is_match(text) {
        Err(parse_error(message, MISSING_ACTION))
    } else if !ACTION_INPUT_REGEX.is_match(text) {
        Err(parse_error(message, MISSING_ACTION_INPUT))
    } else {
        Err(parse_error(message, INVALID_RESPONSE))
    }
}

fn parse_error(message: String, observation: &str) -> AgentError {
    AgentError::OutputParse { message, observation: observation.to_owned() }
}
