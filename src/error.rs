use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SankeyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{}: missing column '{column}'", file.display())]
    MissingColumn { file: PathBuf, column: String },

    #[error("{}:{line}: invalid amount '{value}'", file.display())]
    InvalidAmount {
        file: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Unknown number format: {0}")]
    UnknownNumberFormat(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("No categories to choose an income source from")]
    NoIncomeCandidate,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, SankeyError>;
