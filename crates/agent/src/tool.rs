use async_trait::async_trait;

use crate::AgentError;

/// A named capability the agent can invoke with a single text input.
///
/// Recoverable problems (bad SQL, unknown table) should come back as `Ok`
/// text so the model can read them and retry. `Err` is for failures of the
/// tool itself; the executor still reports those to the model as an
/// observation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Shown to the model next to the name; this is how it picks a tool.
    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> Result<String, AgentError>;
}
