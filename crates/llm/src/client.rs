use ollama_db_core::DEFAULT_CHAT_MODEL;
use ollama_db_core::env_config::env_or_default;

use crate::ai_types::{ChatRequest, ChatResponse, Message};
use crate::error::LlmError;

/// Request timeout. Local models on CPU can take a while per completion.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for LLM API calls.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) temperature: Option<f32>,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmClient {
    /// Creates a new LLM client with the given API key and base URL.
    ///
    /// The model defaults to `OLLAMA_MODEL`, then `gemma`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let model = env_or_default("OLLAMA_MODEL", DEFAULT_CHAT_MODEL);
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model, temperature: None })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single-prompt completion: one user message, optional stop sequences.
    ///
    /// # Errors
    /// Same as [`LlmClient::chat_completion`].
    pub async fn complete(&self, prompt: &str, stop: &[&str]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            stop: stop.iter().map(|s| (*s).to_owned()).collect(),
            temperature: self.temperature,
            stream: false,
        };
        self.chat_completion(&request).await
    }

    /// Send a chat completion request and return the reply text.
    ///
    /// Transport errors and transient statuses are retried up to three times
    /// (1 s, 2 s, 4 s apart). Other failures return at once.
    ///
    /// # Errors
    /// [`LlmError::HttpStatus`] for a non-retryable status,
    /// [`LlmError::JsonParse`] / [`LlmError::EmptyResponse`] for a bad body, and
    /// [`LlmError::RetriesExhausted`] once every attempt failed transiently.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, LlmError> {
        const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

        let mut last_error = match self.send_once(request).await {
            Err(e) if e.is_transient() => e,
            other => return other,
        };
        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            let delay = std::time::Duration::from_secs(*delay_secs);
            tracing::warn!(
                attempt = attempt + 1,
                max = RETRY_DELAYS_SECS.len(),
                ?delay,
                error = %last_error,
                "retrying LLM request"
            );
            tokio::time::sleep(delay).await;
            last_error = match self.send_once(request).await {
                Err(e) if e.is_transient() => e,
                other => return other,
            };
        }
        Err(LlmError::RetriesExhausted(Box::new(last_error)))
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
            context: format!("chat completion response (body: {})", truncate(&body, 200)),
            source: e,
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?
            .message
            .content
            .unwrap_or_default();
        tracing::debug!(model = %request.model, chars = content.len(), "LLM completion");
        Ok(content)
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

/// Strip a surrounding markdown code fence (```` ```sql ````, ```` ``` ````) if present.
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if !tag.trim().contains(' ') => body,
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
