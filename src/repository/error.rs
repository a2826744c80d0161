//! Repository error types

use crate::storage::{StorageError, Vital};
use crate::transfer::TransferError;
use thiserror::Error;

/// Input that cannot become an entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No date/time was given
    #[error("Enter a date and time")]
    MissingTimestamp,

    /// The date/time could not be parsed
    #[error("Cannot parse date and time: {0}")]
    InvalidTimestamp(String),

    /// A vital was not a whole number
    #[error("{vital} must be a whole number (got {input:?})")]
    NotANumber { vital: Vital, input: String },

    /// A vital was outside its accepted range
    #[error("{vital} must be between {min} and {max} (got {value})")]
    OutOfRange {
        vital: Vital,
        value: i32,
        min: i32,
        max: i32,
    },
}

impl ValidationError {
    pub fn out_of_range(vital: Vital, value: i32) -> Self {
        let range = vital.range();
        ValidationError::OutOfRange {
            vital,
            value,
            min: *range.start(),
            max: *range.end(),
        }
    }
}

/// Errors returned by repository operations
///
/// Every error leaves the collection exactly as it was before the call.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Manual input failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// CSV import found nothing usable
    #[error("No readable rows in the CSV input")]
    NoValidRows,

    /// Persisting the collection failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Producing the CSV export failed
    #[error("Export error: {0}")]
    Export(#[from] TransferError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::out_of_range(Vital::Systolic, 300);
        assert_eq!(err.to_string(), "systolic must be between 60 and 250 (got 300)");
    }

    #[test]
    fn test_validation_wraps_into_repository_error() {
        let err: RepositoryError = ValidationError::MissingTimestamp.into();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: Enter a date and time");
    }
}
