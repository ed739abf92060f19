//! Employee records and CSV loading.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Number of columns in an employee CSV record: `id, name, position, salary`.
const CSV_COLUMNS: usize = 4;

/// One row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub salary: i32,
}

impl Employee {
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, position: impl Into<String>, salary: i32) -> Self {
        Self { id, name: name.into(), position: position.into(), salary }
    }

    /// Sentence embedded into the vector collection for retrieval.
    #[must_use]
    pub fn document_text(&self) -> String {
        format!(
            "Employee {} (id {}) works as {} with an annual salary of {}.",
            self.name, self.id, self.position, self.salary
        )
    }

    /// Metadata stored next to the embedded document.
    #[must_use]
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "position": self.position,
            "salary": self.salary,
        })
    }
}

/// Parse employee records from CSV.
///
/// The first row is a header and is skipped without inspection. Every other
/// record must carry exactly four fields. A single malformed record fails the
/// whole parse so callers never load half a file.
pub fn parse_employees_csv<R: Read>(reader: R) -> Result<Vec<Employee>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut employees = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() != CSV_COLUMNS {
            return Err(CoreError::InvalidRecord {
                line,
                reason: format!("expected {CSV_COLUMNS} fields, found {}", record.len()),
            });
        }

        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let id = parse_int(field(0), "id", line)?;
        let salary = parse_int(field(3), "salary", line)?;
        employees.push(Employee::new(id, field(1), field(2), salary));
    }

    tracing::debug!(count = employees.len(), "parsed employee records");
    Ok(employees)
}

/// Open `path` and parse it with [`parse_employees_csv`].
pub fn read_employees_csv(path: &Path) -> Result<Vec<Employee>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CoreError::CsvNotFound(path.to_path_buf()),
        _ => CoreError::Io(e),
    })?;
    parse_employees_csv(file)
}

fn parse_int(value: &str, column: &str, line: u64) -> Result<i32> {
    value.parse().map_err(|_| CoreError::InvalidRecord {
        line,
        reason: format!("column '{column}' is not an integer: {value:?}"),
    })
}
