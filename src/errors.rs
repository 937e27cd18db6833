//! Unified application error type.
//! All modules (db, store, core, kiosk, cli) return AppError to keep the
//! error handling consistent and easy to show in the kiosk error dialog.

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
    // Local database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Remote database
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error payload returned by the remote database, shown verbatim.
    #[error("{code} - {message}")]
    Remote { code: String, message: String },

    // ---------------------------
    // Input / parsing
    // ---------------------------
    #[error("Invalid year level: {0} (expected 1 / 2 / 3 / 4)")]
    InvalidYear(String),

    #[error("Invalid attendance type: {0} (expected IN or OUT)")]
    InvalidDirection(String),

    #[error("Missing value: {0}")]
    Missing(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Lookup
    // ---------------------------
    #[error("Student with ID \"{0}\" not found.")]
    StudentNotFound(String),

    #[error("RFID tag \"{0}\" is not linked to any student.")]
    RfidNotLinked(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

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

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
