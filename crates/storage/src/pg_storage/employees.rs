//! EmployeeStore implementation for PgStorage.

use async_trait::async_trait;
use ollama_db_core::Employee;
use sqlx::Row;
use sqlx::postgres::PgRow;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::EmployeeStore;

#[async_trait]
impl EmployeeStore for PgStorage {
    async fn insert_employees(&self, employees: &[Employee]) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted: u64 = 0;
        for employee in employees {
            let result = sqlx::query(
                "INSERT INTO employees (id, name, position, salary)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(employee.id)
            .bind(&employee.name)
            .bind(&employee.position)
            .bind(employee.salary)
            .execute(&mut *tx)
            .await?;
            inserted = inserted.saturating_add(result.rows_affected());
        }
        tx.commit().await?;

        let skipped = u64::try_from(employees.len()).unwrap_or(u64::MAX).saturating_sub(inserted);
        tracing::info!(inserted, skipped, "employees ingested");
        Ok(inserted)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StorageError> {
        let rows = sqlx::query("SELECT id, name, position, salary FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_employee).collect()
    }

    async fn count_employees(&self) -> Result<u64, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees").fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn row_to_employee(row: &PgRow) -> Result<Employee, StorageError> {
    Ok(Employee {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        position: row.try_get("position")?,
        salary: row.try_get("salary")?,
    })
}
