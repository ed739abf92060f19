//! Storage layer for ollama-db
//!
//! PostgreSQL via sqlx: the `employees` table, read-only SQL introspection
//! for the agent toolkit, and pgvector-backed document collections.

pub mod error;
mod pg_migrations;
mod pg_storage;
pub mod traits;
mod types;

pub use error::StorageError;
pub use pg_storage::{PgStorage, database_name, ensure_database};
pub use traits::{EmployeeStore, SqlDatabase, VectorStore};
pub use types::{ColumnInfo, ScoredDocument, VectorDocument};
