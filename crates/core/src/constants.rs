//! Shared constants for ollama-db.

/// Table holding the employee records.
pub const EMPLOYEES_TABLE: &str = "employees";

/// Vector collection for employee documents, named after the table.
pub const EMPLOYEES_COLLECTION: &str = "employees";

/// Maintenance database used to create the target database.
pub const ADMIN_DATABASE: &str = "postgres";

/// Default target database.
pub const DEFAULT_DB_NAME: &str = "company_db";

/// Default CSV input path, relative to the working directory.
pub const DEFAULT_CSV_FILE: &str = "employees.csv";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Default Ollama server.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gemma";

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Agent loop: maximum LLM round-trips before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// SQL agent: row limit suggested to the model when the user gives none.
pub const DEFAULT_SQL_TOP_K: usize = 10;

/// Retriever: documents returned per similarity search.
pub const DEFAULT_RETRIEVER_K: usize = 4;

/// Sample rows shown per table in schema descriptions.
pub const SAMPLE_ROWS_IN_TABLE_INFO: usize = 3;

/// Tool observations longer than this are truncated before reaching the LLM.
pub const MAX_TOOL_OUTPUT_LEN: usize = 4000;

/// Texts sent per `/api/embed` request.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;
