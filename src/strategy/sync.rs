//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates a job by coordinating between the
//! ledger database, the StatementReader (for CSV input) and the Matcher.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Ledger loading to `LedgerDatabase` and the normalizer
//! - CSV parsing to `StatementReader` (iterator interface)
//! - Matching to `core::reconcile`
//! - CSV output to `csv_format::write_discrepancies_csv`
//!
//! Statements are processed one after another in job order.

use crate::io::sync_reader::StatementReader;
use crate::strategy::{
    load_ledger, reconcile_statement, write_report, ProcessingStrategy, ReconcileJob,
    StatementReport,
};
use crate::types::ReconcileError;
use std::io::Write;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use expense_tally::core::MappingPolicy;
/// use expense_tally::strategy::{ProcessingStrategy, ReconcileJob, SyncProcessingStrategy};
/// use std::path::PathBuf;
///
/// let job = ReconcileJob {
///     statements: vec![PathBuf::from("statement.csv")],
///     ledger: PathBuf::from("expensemanager.db"),
///     policy: MappingPolicy::Skip,
/// };
///
/// let reports = SyncProcessingStrategy
///     .process(&job, &mut std::io::stdout())
///     .expect("Processing failed");
/// println!("{} statements reconciled", reports.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Reconcile every statement of the job sequentially
    ///
    /// 1. Reads and normalizes the ledger once
    /// 2. Streams each statement through a StatementReader
    /// 3. Reconciles each statement against a fresh index
    /// 4. Writes the discrepancies of all statements to output
    fn process(
        &self,
        job: &ReconcileJob,
        output: &mut dyn Write,
    ) -> Result<Vec<StatementReport>, ReconcileError> {
        let ledger = load_ledger(&job.ledger, job.policy)?;
        let mut reports = Vec::with_capacity(job.statements.len());

        for statement in &job.statements {
            let reader = StatementReader::open(statement)?;
            let format = reader.format();
            let mut transactions = Vec::new();

            for result in reader {
                match result {
                    Ok(transaction) => transactions.push(transaction),
                    Err(e @ ReconcileError::ParseError { .. }) => {
                        tracing::warn!(
                            statement = %statement.display(),
                            error = %e,
                            "Skipping malformed statement line"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            reports.push(reconcile_statement(statement, format, transactions, &ledger)?);
        }

        write_report(&reports, output)?;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MappingPolicy;
    use crate::types::DiscrepancyReason;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn create_ledger(dir: &TempDir, rows: &[(i64, &str, &str)]) -> PathBuf {
        let path = dir.path().join("ledger.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE expense_report (_id INTEGER PRIMARY KEY, account TEXT, amount TEXT,
             category TEXT, subcategory TEXT, payment_method TEXT, description TEXT,
             expensed_time INTEGER, referenceNumber TEXT);",
        )
        .unwrap();
        for (id, amount, method) in rows {
            conn.execute(
                "INSERT INTO expense_report VALUES (?1, 'Personal', ?2, 'Food', '', ?3, 'entry', 1710475200000, '')",
                rusqlite::params![id, amount, method],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_sync_strategy_reports_discrepancies() {
        let dir = TempDir::new().unwrap();
        let ledger = create_ledger(
            &dir,
            &[(1, "12.50", "Credit Card"), (2, "12.50", "Credit Card"), (3, "9.99", "Cash")],
        );
        let statement = create_temp_csv(
            "Date,Description,Amount\n\
             2024-03-15,DINNER,12.50\n\
             2024-03-16,BOOKSHOP,9.99\n\
             2024-03-17,PAYMENT RECEIVED,-100.00\n",
        );
        let job = ReconcileJob {
            statements: vec![statement.path().to_path_buf()],
            ledger,
            policy: MappingPolicy::Skip,
        };

        let mut output = Vec::new();
        let reports = SyncProcessingStrategy.process(&job, &mut output).unwrap();

        assert_eq!(reports.len(), 1);
        let report = &reports[0].report;
        assert_eq!(reports[0].credits_skipped, 1);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.discrepancies.len(), 1);
        assert_eq!(
            report.discrepancies[0].reason,
            DiscrepancyReason::NoMatchingLedgerEntry
        );
        assert_eq!(report.residue.len(), 2);

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("statement,date,description,amount,payment_method,reason\n"));
        assert!(output_str.contains("BOOKSHOP,9.99,Credit Card,no_matching_ledger_entry"));
    }

    #[test]
    fn test_sync_strategy_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let ledger = create_ledger(&dir, &[(1, "5.00", "Credit Card")]);
        let statement = create_temp_csv(
            "Date,Description,Amount\n\
             not-a-date,BROKEN,1.00\n\
             2024-03-15,LUNCH,5.00\n",
        );
        let job = ReconcileJob {
            statements: vec![statement.path().to_path_buf()],
            ledger,
            policy: MappingPolicy::Skip,
        };

        let reports = SyncProcessingStrategy.process(&job, &mut Vec::new()).unwrap();

        assert_eq!(reports[0].report.matches.len(), 1);
        assert!(reports[0].report.is_clean());
    }

    #[test]
    fn test_sync_strategy_abort_policy_fails_on_invalid_row() {
        let dir = TempDir::new().unwrap();
        let ledger = create_ledger(&dir, &[(1, "5.00", "Cheque")]);
        let statement = create_temp_csv("Date,Description,Amount\n2024-03-15,LUNCH,5.00\n");
        let job = ReconcileJob {
            statements: vec![statement.path().to_path_buf()],
            ledger,
            policy: MappingPolicy::Abort,
        };

        let result = SyncProcessingStrategy.process(&job, &mut Vec::new());

        let error = result.unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn test_sync_strategy_missing_statement() {
        let dir = TempDir::new().unwrap();
        let ledger = create_ledger(&dir, &[]);
        let job = ReconcileJob {
            statements: vec![PathBuf::from("nonexistent.csv")],
            ledger,
            policy: MappingPolicy::Skip,
        };

        let result = SyncProcessingStrategy.process(&job, &mut Vec::new());
        assert!(matches!(result, Err(ReconcileError::FileNotFound { .. })));
    }
}
