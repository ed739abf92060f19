use async_trait::async_trait;
use ollama_db_core::Employee;

use crate::error::StorageError;

/// Employee table operations.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert employees in one transaction, skipping ids that already exist.
    ///
    /// Returns the number of rows actually inserted. On error nothing is committed.
    async fn insert_employees(&self, employees: &[Employee]) -> Result<u64, StorageError>;

    /// All employees ordered by id.
    async fn list_employees(&self) -> Result<Vec<Employee>, StorageError>;

    async fn count_employees(&self) -> Result<u64, StorageError>;
}
