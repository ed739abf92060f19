//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod employees;
mod sql_database;
mod table_info;
mod vectors;

use std::str::FromStr;
use std::time::Duration;

use crate::error::StorageError;
use ollama_db_core::{
    ADMIN_DATABASE, DbConfig, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};

use super::pg_migrations::run_pg_migrations;

/// Tables owned by the vector store, hidden from the SQL toolkit.
pub(crate) const INTERNAL_TABLES: [&str; 2] = ["vector_collections", "vector_documents"];

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect to the configured database without touching its schema.
    ///
    /// The database must already exist; see [`ensure_database`]. Call
    /// [`PgStorage::migrate`] before using the employee or vector stores on a
    /// fresh database.
    pub async fn connect(config: &DbConfig) -> Result<Self, StorageError> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;
        tracing::info!("PgStorage connected");
        Ok(Self { pool })
    }

    /// Create the pgvector extension, the `employees` table and the vector tables.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        run_pg_migrations(&self.pool).await.map_err(|e| StorageError::Migration(e.to_string()))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Create the target database when it does not exist yet.
///
/// Connects to the `postgres` maintenance database with the same credentials.
/// Returns `true` if the database was created by this call.
pub async fn ensure_database(config: &DbConfig) -> Result<bool, StorageError> {
    let options = connect_options(config)?;
    let target = target_database(&options, config);

    let mut conn = PgConnection::connect_with(&options.clone().database(ADMIN_DATABASE)).await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&target)
        .fetch_optional(&mut conn)
        .await?;

    let created = if exists.is_some() {
        tracing::info!(database = %target, "database already exists");
        false
    } else {
        tracing::info!(database = %target, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
            .execute(&mut conn)
            .await?;
        true
    };

    conn.close().await?;
    Ok(created)
}

/// Name of the database a config points at; a URL path wins over `DB_NAME`.
pub fn database_name(config: &DbConfig) -> Result<String, StorageError> {
    Ok(target_database(&connect_options(config)?, config))
}

fn target_database(options: &PgConnectOptions, config: &DbConfig) -> String {
    options.get_database().unwrap_or(&config.database).to_owned()
}

pub(crate) fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, StorageError> {
    if let Some(url) = &config.url {
        return Ok(PgConnectOptions::from_str(url)?);
    }
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database);
    Ok(match &config.password {
        Some(password) => options.password(password),
        None => options,
    })
}

/// Quote an SQL identifier, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// pgvector text literal: `[0.1,0.2,...]`.
pub(crate) fn vector_literal(embedding: &[f32]) -> String {
    format!("[{}]", embedding.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(","))
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}
