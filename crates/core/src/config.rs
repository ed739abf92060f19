//! Connection settings read from the environment.

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_DB_NAME, DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_BASE_URL,
};
use crate::env_config::{env_non_empty, env_or_default, env_parse_with_default};

/// PostgreSQL connection settings.
///
/// `url` takes precedence over the individual fields when set; the database
/// bootstrap step still swaps in the admin database name on top of it.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_owned(),
            port: 5432,
            user: "postgres".to_owned(),
            password: None,
            database: DEFAULT_DB_NAME.to_owned(),
        }
    }
}

impl DbConfig {
    /// Reads `DATABASE_URL`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_non_empty("DATABASE_URL"),
            host: env_or_default("DB_HOST", &defaults.host),
            port: env_parse_with_default("DB_PORT", defaults.port),
            user: env_or_default("DB_USER", &defaults.user),
            password: env_non_empty("DB_PASSWORD"),
            database: env_or_default("DB_NAME", &defaults.database),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.url = url;
        }
        self
    }
}

/// Ollama server settings.
#[derive(Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    pub api_key: String,
}

impl std::fmt::Debug for OllamaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaConfig")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embed_model", &self.embed_model)
            .field("api_key", &"***")
            .finish()
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_owned(),
            chat_model: DEFAULT_CHAT_MODEL.to_owned(),
            embed_model: DEFAULT_EMBED_MODEL.to_owned(),
            // Ollama ignores the bearer token but the OpenAI-compatible route expects one.
            api_key: "ollama".to_owned(),
        }
    }
}

impl OllamaConfig {
    /// Reads `OLLAMA_BASE_URL`, `OLLAMA_MODEL`, `OLLAMA_EMBED_MODEL`, `OLLAMA_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or_default("OLLAMA_BASE_URL", &defaults.base_url),
            chat_model: env_or_default("OLLAMA_MODEL", &defaults.chat_model),
            embed_model: env_or_default("OLLAMA_EMBED_MODEL", &defaults.embed_model),
            api_key: env_or_default("OLLAMA_API_KEY", &defaults.api_key),
        }
    }
}
