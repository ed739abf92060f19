//! VectorStore implementation for PgStorage (pgvector, cosine distance).

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{PgStorage, usize_to_i64, vector_literal};
use crate::error::StorageError;
use crate::traits::VectorStore;
use crate::types::{ScoredDocument, VectorDocument};

#[async_trait]
impl VectorStore for PgStorage {
    async fn ensure_collection(&self, name: &str) -> Result<Uuid, StorageError> {
        sqlx::query(
            "INSERT INTO vector_collections (id, name) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(&self.pool)
        .await?;

        let id: Uuid = sqlx::query_scalar("SELECT id FROM vector_collections WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    StorageError::NotFound { entity: "collection", id: name.to_owned() }
                },
                other => other.into(),
            })?;
        Ok(id)
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        documents: &[VectorDocument],
    ) -> Result<u64, StorageError> {
        let collection_id = self.ensure_collection(collection).await?;
        let mut tx = self.pool.begin().await?;
        let mut written: u64 = 0;
        for doc in documents {
            // Stable id per (collection, source) keeps re-indexing idempotent.
            let id = Uuid::new_v5(&collection_id, doc.source_id.as_bytes());
            let result = sqlx::query(
                "INSERT INTO vector_documents
                        (id, collection_id, source_id, content, metadata, embedding)
                 VALUES ($1, $2, $3, $4, $5, $6::vector)
                 ON CONFLICT (collection_id, source_id) DO UPDATE
                    SET content = EXCLUDED.content,
                        metadata = EXCLUDED.metadata,
                        embedding = EXCLUDED.embedding",
            )
            .bind(id)
            .bind(collection_id)
            .bind(&doc.source_id)
            .bind(&doc.content)
            .bind(&doc.metadata)
            .bind(vector_literal(&doc.embedding))
            .execute(&mut *tx)
            .await?;
            written = written.saturating_add(result.rows_affected());
        }
        tx.commit().await?;
        tracing::info!(collection, written, "vector documents upserted");
        Ok(written)
    }

    async fn similarity_search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, StorageError> {
        if embedding.is_empty() || k == 0 || !self.vector_tables_exist().await? {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT d.source_id, d.content, d.metadata,
                    1.0 - (d.embedding <=> $1::vector) AS score
               FROM vector_documents d
               JOIN vector_collections c ON c.id = d.collection_id
              WHERE c.name = $2
              ORDER BY d.embedding <=> $1::vector
              LIMIT $3",
        )
        .bind(vector_literal(embedding))
        .bind(collection)
        .bind(usize_to_i64(k))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_scored_document).collect()
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError> {
        if !self.vector_tables_exist().await? {
            return Ok(0);
        }
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
               FROM vector_documents d
               JOIN vector_collections c ON c.id = d.collection_id
              WHERE c.name = $1",
        )
        .bind(collection)
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete_collection(&self, name: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM vector_collections WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PgStorage {
    /// False on a database that was never migrated.
    async fn vector_tables_exist(&self) -> Result<bool, StorageError> {
        let exists: bool =
            sqlx::query_scalar("SELECT to_regclass('public.vector_documents') IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

fn row_to_scored_document(row: &PgRow) -> Result<ScoredDocument, StorageError> {
    Ok(ScoredDocument {
        source_id: row.try_get("source_id")?,
        content: row.try_get("content")?,
        metadata: row.try_get("metadata")?,
        score: row.try_get("score")?,
    })
}
