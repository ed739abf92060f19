//! ReAct loop: prompt the model, run the tool it picks, feed back the result.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ollama_db_core::{DEFAULT_MAX_ITERATIONS, DEFAULT_SQL_TOP_K, MAX_TOOL_OUTPUT_LEN};
use ollama_db_llm::{LlmClient, truncate};

use crate::prompts::{FORMAT_INSTRUCTIONS, render};
use crate::react::{AgentAction, AgentDecision, parse_react_output};
use crate::{AgentError, Tool};

/// Output when the loop gives up before a final answer.
pub const STOPPED_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

const STOP_SEQUENCE: &str = "\nObservation:";

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub max_iterations: usize,
    /// Feed format errors back to the model instead of failing the run.
    pub handle_parsing_errors: bool,
    pub max_execution_time: Option<Duration>,
    /// Row limit suggested to the SQL agent.
    pub top_k: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            handle_parsing_errors: true,
            max_execution_time: None,
            top_k: DEFAULT_SQL_TOP_K,
        }
    }
}

/// One completed Thought / Action / Observation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStep {
    pub tool: String,
    pub tool_input: String,
    pub log: String,
    pub observation: String,
}

#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub input: String,
    pub output: String,
    pub intermediate_steps: Vec<AgentStep>,
}

pub struct AgentExecutor {
    llm: Arc<LlmClient>,
    tools: Vec<Arc<dyn Tool>>,
    prefix: String,
    initial_thought: Option<String>,
    options: AgentOptions,
}

impl std::fmt::Debug for AgentExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentExecutor")
            .field("llm", &self.llm)
            .field("tools", &self.tool_names())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AgentExecutor {
    pub fn new(
        llm: Arc<LlmClient>,
        tools: Vec<Arc<dyn Tool>>,
        prefix: impl Into<String>,
        options: AgentOptions,
    ) -> Self {
        Self { llm, tools, prefix: prefix.into(), initial_thought: None, options }
    }

    /// Seed the first `Thought:` line before the model continues.
    #[must_use]
    pub fn with_initial_thought(mut self, thought: impl Into<String>) -> Self {
        self.initial_thought = Some(thought.into());
        self
    }

    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Answer a question and return only the final text.
    pub async fn run(&self, input: &str) -> Result<String, AgentError> {
        Ok(self.invoke(input).await?.output)
    }

    /// Answer a question, keeping the intermediate steps.
    pub async fn invoke(&self, input: &str) -> Result<AgentResponse, AgentError> {
        let started = Instant::now();
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut iterations: usize = 0;

        while self.should_continue(iterations, started.elapsed()) {
            let prompt = self.build_prompt(input, &steps);
            let completion = self.llm.complete(&prompt, &[STOP_SEQUENCE]).await?;
            iterations = iterations.saturating_add(1);

            let step = match parse_react_output(&completion) {
                Ok(AgentDecision::Finish { output, .. }) => {
                    tracing::info!(iterations, output = %output, "agent finished");
                    return Ok(AgentResponse {
                        input: input.to_owned(),
                        output,
                        intermediate_steps: steps,
                    });
                },
                Ok(AgentDecision::Action(action)) => self.run_action(action).await,
                Err(AgentError::OutputParse { message, observation })
                    if self.options.handle_parsing_errors =>
                {
                    tracing::warn!(error = %message, "model output did not parse");
                    AgentStep {
                        tool: "_Exception".to_owned(),
                        tool_input: observation.clone(),
                        log: completion,
                        observation,
                    }
                },
                Err(e) => return Err(e),
            };
            steps.push(step);
        }

        tracing::warn!(iterations, elapsed = ?started.elapsed(), "agent stopped early");
        Ok(AgentResponse {
            input: input.to_owned(),
            output: STOPPED_OUTPUT.to_owned(),
            intermediate_steps: steps,
        })
    }

    fn should_continue(&self, iterations: usize, elapsed: Duration) -> bool {
        iterations < self.options.max_iterations
            && self.options.max_execution_time.is_none_or(|limit| elapsed < limit)
    }

    async fn run_action(&self, action: AgentAction) -> AgentStep {
        tracing::info!(tool = %action.tool, input = %action.tool_input, "agent action");
        let observation = match self.tools.iter().find(|t| t.name() == action.tool) {
            Some(tool) => match tool.call(&action.tool_input).await {
                Ok(out) => out,
                Err(e) => {
                    tracing::warn!(tool = %action.tool, error = %e, "tool call failed");
                    format!("Error: {e}")
                },
            },
            None => format!(
                "{} is not a valid tool, try one of [{}].",
                action.tool,
                self.tool_names().join(", ")
            ),
        };
        let observation = truncate(&observation, MAX_TOOL_OUTPUT_LEN).to_owned();
        tracing::info!(tool = %action.tool, observation = %observation, "observation");
        AgentStep {
            tool: action.tool,
            tool_input: action.tool_input,
            log: action.log,
            observation,
        }
    }

    pub(crate) fn build_prompt(&self, input: &str, steps: &[AgentStep]) -> String {
        let tool_strings = self
            .tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = self.tool_names().join(", ");
        let format_instructions = render(FORMAT_INSTRUCTIONS, &[("tool_names", &tool_names)]);

        let mut prompt = format!(
            "{}\n\n{tool_strings}\n\n{format_instructions}\n\nBegin!\n\nQuestion: {input}\nThought:",
            self.prefix
        );
        if let Some(thought) = &self.initial_thought {
            let _ = writeln!(prompt, " {thought}");
        }
        for step in steps {
            let _ = write!(prompt, "{}\nObservation: {}\nThought: ", step.log, step.observation);
        }
        prompt
    }
}
