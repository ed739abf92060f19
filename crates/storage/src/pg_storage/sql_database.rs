//! SqlDatabase implementation for PgStorage.

use async_trait::async_trait;
use sqlx::Row;

use super::table_info::{PrimaryKey, render_create_table, render_sample_rows};
use super::{INTERNAL_TABLES, PgStorage, quote_ident, usize_to_i64};
use crate::error::StorageError;
use crate::traits::SqlDatabase;
use crate::types::ColumnInfo;
use ollama_db_core::SAMPLE_ROWS_IN_TABLE_INFO;

#[async_trait]
impl SqlDatabase for PgStorage {
    fn dialect(&self) -> &str {
        "postgresql"
    }

    async fn list_tables(&self) -> Result<Vec<String>, StorageError> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text
               FROM information_schema.tables
              WHERE table_schema = 'public'
                AND table_type IN ('BASE TABLE', 'VIEW')
              ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tables.into_iter().filter(|t| !INTERNAL_TABLES.contains(&t.as_str())).collect())
    }

    async fn table_info(&self, tables: &[String]) -> Result<String, StorageError> {
        let available = self.list_tables().await?;
        let missing: Vec<String> =
            tables.iter().filter(|t| !available.contains(t)).cloned().collect();
        if !missing.is_empty() {
            return Err(StorageError::UnknownTables(missing));
        }

        let mut blocks = Vec::with_capacity(tables.len());
        for table in tables {
            let columns = self.columns(table).await?;
            let primary_key = self.primary_key(table).await?;
            let samples = self.sample_rows(table).await?;
            blocks.push(format!(
                "{}\n\n{}",
                render_create_table(table, &columns, primary_key.as_ref()),
                render_sample_rows(table, &columns, &samples)
            ));
        }
        Ok(blocks.join("\n\n"))
    }

    async fn run_query(&self, sql: &str) -> Result<String, StorageError> {
        let query = prepare_read_only_query(sql)?;
        tracing::debug!(query = %query, "running toolkit query");

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY").execute(&mut *tx).await?;
        let rows: String = sqlx::query_scalar(&format!(
            "SELECT COALESCE(json_agg(q), '[]'::json)::text FROM (\n{query}\n) AS q"
        ))
        .fetch_one(&mut *tx)
        .await?;
        tx.rollback().await?;

        Ok(if rows == "[]" { String::new() } else { rows })
    }
}

impl PgStorage {
    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, StorageError> {
        let rows = sqlx::query(
            "SELECT column_name::text AS name,
                    CASE WHEN data_type = 'USER-DEFINED' THEN udt_name::text
                         ELSE data_type::text END AS data_type,
                    character_maximum_length::int4 AS max_length,
                    (is_nullable = 'YES') AS nullable
               FROM information_schema.columns
              WHERE table_schema = 'public' AND table_name::text = $1
              ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo, StorageError> {
                Ok(ColumnInfo {
                    name: row.try_get("name")?,
                    data_type: row.try_get("data_type")?,
                    max_length: row.try_get("max_length")?,
                    nullable: row.try_get("nullable")?,
                })
            })
            .collect()
    }

    async fn primary_key(&self, table: &str) -> Result<Option<PrimaryKey>, StorageError> {
        let rows = sqlx::query(
            "SELECT tc.constraint_name::text AS constraint_name,
                    kcu.column_name::text AS column_name
               FROM information_schema.table_constraints tc
               JOIN information_schema.key_column_usage kcu
                 ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
              WHERE tc.table_schema = 'public'
                AND tc.table_name::text = $1
                AND tc.constraint_type = 'PRIMARY KEY'
              ORDER BY kcu.ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let name: String = first.try_get("constraint_name")?;
        let columns = rows
            .iter()
            .map(|row| row.try_get::<String, _>("column_name"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(PrimaryKey { name, columns }))
    }

    async fn sample_rows(&self, table: &str) -> Result<Vec<serde_json::Value>, StorageError> {
        let rows: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT row_to_json(t)::text FROM (SELECT * FROM {} LIMIT $1) AS t",
            quote_ident(table)
        ))
        .bind(usize_to_i64(SAMPLE_ROWS_IN_TABLE_INFO))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|r| serde_json::from_str(r).map_err(StorageError::from)).collect()
    }
}

/// Normalize a toolkit query and reject anything but `SELECT` / `WITH`.
///
/// The statement also runs inside a read-only transaction, so this check only
/// produces a clearer error for the model.
pub(crate) fn prepare_read_only_query(sql: &str) -> Result<String, StorageError> {
    let stripped = strip_line_comments(sql);
    let query = stripped.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if query.is_empty() {
        return Err(StorageError::InvalidQuery("empty query".to_owned()));
    }
    let first_word = query
        .trim_start_matches('(')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();
    if first_word != "SELECT" && first_word != "WITH" {
        return Err(StorageError::InvalidQuery(format!(
            "only read-only SELECT queries are allowed, got {first_word}"
        )));
    }
    Ok(query.to_owned())
}

/// Drop `--` comments that sit outside string literals and quoted identifiers.
/// Line breaks are kept so the statement layout is unchanged.
fn strip_line_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match quote {
            Some(open) => {
                if c == open {
                    quote = None;
                }
                out.push(c);
            },
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            },
            None if c == '-' && chars.peek() == Some(&'-') => {
                if chars.by_ref().any(|rest| rest == '\n') {
                    out.push('\n');
                }
            },
            None => out.push(c),
        }
    }
    out
}
