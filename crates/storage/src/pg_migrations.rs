//! PostgreSQL schema migrations for ollama-db storage.
//!
//! Every statement is idempotent; running them against an initialized
//! database is a no-op.

use sqlx::PgPool;

/// Run all PostgreSQL migrations.
pub(crate) async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // pgvector extension
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector").execute(pool).await?;
    tracing::info!("pgvector extension enabled");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            position VARCHAR(255) NOT NULL,
            salary INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Vector collections
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vector_collections (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            metadata JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // No fixed dimension on `embedding`: any embedding model can fill a collection.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vector_documents (
            id UUID PRIMARY KEY,
            collection_id UUID NOT NULL REFERENCES vector_collections (id) ON DELETE CASCADE,
            source_id TEXT NOT NULL,
            content TEXT NOT NULL,
            metadata JSONB NOT NULL DEFAULT '{}',
            embedding vector NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (collection_id, source_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_vdoc_collection ON vector_documents (collection_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("schema migrations applied");
    Ok(())
}
