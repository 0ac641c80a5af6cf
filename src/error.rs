//! Error types for the interest accrual pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, AccrualError>;

/// Errors that can occur while loading, projecting or writing a ledger.
///
/// Every variant is fatal: the run aborts and nothing is written.
#[derive(Error, Debug)]
pub enum AccrualError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed configuration file
    #[error("Configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet could not be opened or read
    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    /// Spreadsheet could not be written
    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Interactive prompt failed (e.g. no terminal attached)
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Ledger row with an unparsable date or amount
    #[error("Invalid row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    /// File extension with no registered format adapter
    #[error("Unsupported file type for {}. Please use a .csv or .xlsx file.", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Spreadsheet without any worksheet
    #[error("Spreadsheet {} has no worksheets", .path.display())]
    EmptyWorkbook { path: PathBuf },

    /// Input or output path neither configured nor entered
    #[error("Missing {0} file path")]
    MissingPath(&'static str),
}
