use std::io;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while loading domain data.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("The file '{}' was not found", .0.display())]
    CsvNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, CoreError>;
