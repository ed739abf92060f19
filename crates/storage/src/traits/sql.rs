use async_trait::async_trait;

use crate::error::StorageError;

/// Read-only SQL access used by the agent toolkit.
#[async_trait]
pub trait SqlDatabase: Send + Sync {
    /// SQL dialect name shown to the model.
    fn dialect(&self) -> &str;

    /// Tables the toolkit may query, sorted by name.
    async fn list_tables(&self) -> Result<Vec<String>, StorageError>;

    /// `CREATE TABLE` rendering plus sample rows for each requested table.
    ///
    /// Fails with [`StorageError::UnknownTables`] if any name is not in
    /// [`SqlDatabase::list_tables`].
    async fn table_info(&self, tables: &[String]) -> Result<String, StorageError>;

    /// Run a read-only query and return its rows as a JSON array.
    ///
    /// Returns an empty string when the query yields no rows.
    async fn run_query(&self, sql: &str) -> Result<String, StorageError>;
}
