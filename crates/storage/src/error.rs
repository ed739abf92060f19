//! Typed error enum for the storage layer.
//!
//! Lets callers match on specific failure modes, such as an unknown table or a
//! rejected query, instead of downcasting opaque boxes.

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row data could not be deserialized into domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// Requested tables are not visible to the toolkit.
    #[error("table_names {0:?} not found in database")]
    UnknownTables(Vec<String>),

    /// Query rejected before reaching the database.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Custom `From<sqlx::Error>`, not a blanket `#[from]`.
///
/// `RowNotFound` becomes a generic `NotFound` that callers remap with entity
/// context; everything else is `Database`.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            other => Self::Database(other),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
