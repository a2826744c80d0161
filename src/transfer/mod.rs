//! CSV Transfer
//!
//! Import and export of the measurement log as CSV text:
//!
//! ```text
//! timestamp,systolic,diastolic,pulse
//! 1700000000000,120,80,65
//! ```
//!
//! Timestamps are integer epoch milliseconds.

pub mod csv_export;
pub mod csv_import;

pub use csv_export::{export_csv, CsvExport};
pub use csv_import::{parse_csv, CsvParseResult, ImportedRow};

use thiserror::Error;

/// Column names written on export
pub const CSV_COLUMNS: [&str; 4] = ["timestamp", "systolic", "diastolic", "pulse"];

/// Substring that marks the first record as a header on import
pub const CSV_HEADER_MARKER: &str = "timestamp";

/// Name of the exported file
pub const EXPORT_FILENAME: &str = "bpbook.csv";

/// Errors raised while producing CSV output
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type TransferResult<T> = Result<T, TransferError>;
