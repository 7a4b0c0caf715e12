//! Error types for expense reconciliation
//!
//! This module defines all error types that can occur while loading inputs and
//! reconciling them. Errors are designed to be descriptive and user-friendly for
//! CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Statement Errors**: Malformed CSV, unrecognized statement layout
//! - **Ledger Errors**: Database access failures
//! - **Validation Errors**: Ledger rows or bank lines missing data the engine needs
//!
//! A bank transaction without a matching ledger entry is *not* an error; it is
//! reported as a [`crate::types::DiscrepantTransaction`].

use thiserror::Error;

/// Main error type for the reconciliation engine
///
/// Each variant includes enough context to locate the offending file, line or
/// ledger row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents the run from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed statement line is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The statement file does not contain a known header row
    #[error("Unrecognized bank statement format: {path}")]
    UnrecognizedFormat {
        /// Path of the statement file
        path: String,
    },

    /// The ledger database could not be opened or queried
    #[error("Ledger database error: {message}")]
    DatabaseError {
        /// Message reported by the database driver
        message: String,
    },

    /// A background task failed (runtime construction, panicked task, etc.)
    #[error("Task failed: {message}")]
    TaskFailed {
        /// Description of the failure
        message: String,
    },

    /// A transaction carries no amount at all
    ///
    /// This is a validation error: it indicates a parsing defect upstream
    /// rather than a genuine discrepancy.
    #[error("{record} has no amount")]
    MissingAmount {
        /// Description of the offending record
        record: String,
    },

    /// Amount value could not be parsed
    #[error("Invalid amount '{amount}' for {record}")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// Description of the offending record
        record: String,
    },

    /// A ledger row has no payment method
    #[error("{record} has no payment method")]
    MissingPaymentMethod {
        /// Description of the offending record
        record: String,
    },

    /// A ledger row names a payment method outside the supported set
    #[error("Unknown payment method '{value}' for {record}")]
    UnknownPaymentMethod {
        /// The unrecognized label
        value: String,
        /// Description of the offending record
        record: String,
    },
}

impl ReconcileError {
    /// Whether this error describes malformed or incomplete input data
    ///
    /// Validation errors are surfaced to the caller, who decides whether to
    /// skip the record or abort the run.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReconcileError::MissingAmount { .. }
                | ReconcileError::InvalidAmount { .. }
                | ReconcileError::MissingPaymentMethod { .. }
                | ReconcileError::UnknownPaymentMethod { .. }
        )
    }
}

// Conversion from io::Error to ReconcileError
impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ReconcileError
impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ReconcileError {
    fn from(error: rusqlite::Error) -> Self {
        ReconcileError::DatabaseError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReconcileError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        ReconcileError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: &str) -> Self {
        ReconcileError::ParseError {
            line,
            message: message.to_string(),
        }
    }

    /// Create an UnrecognizedFormat error
    pub fn unrecognized_format(path: &str) -> Self {
        ReconcileError::UnrecognizedFormat {
            path: path.to_string(),
        }
    }

    /// Create a TaskFailed error
    pub fn task_failed(message: &str) -> Self {
        ReconcileError::TaskFailed {
            message: message.to_string(),
        }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(record: &str) -> Self {
        ReconcileError::MissingAmount {
            record: record.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, record: &str) -> Self {
        ReconcileError::InvalidAmount {
            amount: amount.to_string(),
            record: record.to_string(),
        }
    }

    /// Create a MissingPaymentMethod error
    pub fn missing_payment_method(record: &str) -> Self {
        ReconcileError::MissingPaymentMethod {
            record: record.to_string(),
        }
    }

    /// Create an UnknownPaymentMethod error
    pub fn unknown_payment_method(value: &str, record: &str) -> Self {
        ReconcileError::UnknownPaymentMethod {
            value: value.to_string(),
            record: record.to_string(),
        }
    }
}
