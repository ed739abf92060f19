use std::path::Path;

use anyhow::{Result, bail};
use ollama_db_core::{DbConfig, EMPLOYEES_TABLE, Employee, read_employees_csv};
use ollama_db_storage::{EmployeeStore, PgStorage, database_name, ensure_database};

const RULE_WIDTH: usize = 40;

/// Setup, load and validate. Every step runs even if an earlier one failed.
pub(crate) async fn run_ingest(db: &DbConfig, csv_path: &Path) -> Result<()> {
    let mut failed: Vec<&str> = Vec::new();

    let storage = match setup_database(db).await {
        Ok(storage) => Some(storage),
        Err(e) => {
            tracing::error!(error = %e, "Error setting up database");
            failed.push("setup");
            None
        },
    };

    if let Err(e) = ingest_csv(storage.as_ref(), db, csv_path).await {
        tracing::error!(error = %e, csv = %csv_path.display(), "Error ingesting data");
        failed.push("ingest");
    }

    if let Err(e) = run_validate_with(storage.as_ref(), db).await {
        tracing::error!(error = %e, "Error validating data");
        failed.push("validate");
    }

    if !failed.is_empty() {
        bail!("ingest finished with failed steps: {}", failed.join(", "));
    }
    Ok(())
}

pub(crate) async fn run_validate(db: &DbConfig) -> Result<()> {
    run_validate_with(None, db).await
}

async fn setup_database(db: &DbConfig) -> Result<PgStorage> {
    let name = database_name(db)?;
    if ensure_database(db).await? {
        println!("{}", created_message(&name));
    } else {
        println!("{}", exists_message(&name));
    }
    let storage = PgStorage::connect(db).await?;
    storage.migrate().await?;
    println!("Table '{EMPLOYEES_TABLE}' is ready.");
    Ok(storage)
}

fn created_message(name: &str) -> String {
    format!("Creating database: {name}")
}

fn exists_message(name: &str) -> String {
    format!("Database '{name}' already exists.")
}

/// Reuses the setup connection; otherwise connects without migrating.
async fn connected(storage: Option<&PgStorage>, db: &DbConfig) -> Result<PgStorage> {
    match storage {
        Some(storage) => Ok(storage.clone()),
        None => Ok(PgStorage::connect(db).await?),
    }
}

async fn ingest_csv(storage: Option<&PgStorage>, db: &DbConfig, csv_path: &Path) -> Result<()> {
    let employees = read_employees_csv(csv_path)?;
    let storage = connected(storage, db).await?;
    let inserted = storage.insert_employees(&employees).await?;
    tracing::info!(rows = employees.len(), inserted, "CSV loaded");
    println!(
        "Data from '{}' ingested successfully into '{EMPLOYEES_TABLE}'.",
        csv_path.display()
    );
    Ok(())
}

async fn run_validate_with(storage: Option<&PgStorage>, db: &DbConfig) -> Result<()> {
    let storage = connected(storage, db).await?;
    let employees = storage.list_employees().await?;
    print!("{}", render_validation(&employees));
    Ok(())
}

fn render_validation(employees: &[Employee]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!("\n--- Validating Data in '{EMPLOYEES_TABLE}' table ---\n");
    if employees.is_empty() {
        out.push_str("No data found in the table.\n");
    } else {
        out.push_str("Columns: id, name, position, salary\n");
        out.push_str(&rule);
        out.push('\n');
        for employee in employees {
            out.push_str(&format_row(employee));
            out.push('\n');
        }
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

fn format_row(e: &Employee) -> String {
    format!("({}, '{}', '{}', {})", e.id, e.name, e.position, e.salary)
}
