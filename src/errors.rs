//! Unified application error type.
//! All modules (ingest, db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Ingestion errors
    // ---------------------------
    #[error("Unable to find header row in the first {probed} lines of the CSV file")]
    HeaderNotFound { probed: usize },

    #[error("Decode error at line {line}, column '{column}': {message}")]
    Decode {
        line: u64,
        column: String,
        message: String,
    },

    #[error("Failed to write readings batch: {0}")]
    SinkWrite(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("No reading found with id {0}")]
    ReadingNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Build a decode error pointing at a file line and a column label.
    pub fn decode(line: u64, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            line,
            column: column.into(),
            message: message.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
