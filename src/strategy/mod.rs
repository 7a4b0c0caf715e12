//! Processing strategy module for reconciliation runs
//!
//! This module defines the Strategy pattern for complete reconciliation
//! pipelines, encompassing ledger loading, statement parsing and matching. This
//! allows different processing implementations (synchronous, asynchronous) to
//! be selected at runtime.
//!
//! Both strategies share the same run semantics:
//! - The ledger is read and normalized once per job
//! - Every statement file is an independent run with its own index built from
//!   that ledger snapshot
//! - Only debit lines are matched; credits are counted and left out
//! - Reports are returned and written in statement order

use crate::cli::StrategyType;
use crate::core::{normalize, reconcile, MappingPolicy, ReconciliationIndex};
use crate::io::{write_discrepancies_csv, LedgerDatabase, LedgerSource};
use crate::types::{BankFormat, BankTransaction, LedgerTransaction, ReconcileError, ReconciliationReport};
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, RunConfig};
pub use sync::SyncProcessingStrategy;

/// Inputs of a reconciliation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileJob {
    /// Bank statement files, reconciled in this order
    pub statements: Vec<PathBuf>,
    /// Expense Manager database file
    pub ledger: PathBuf,
    /// How ledger rows that cannot be mapped are handled
    pub policy: MappingPolicy,
}

/// Reconciliation result for one statement file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementReport {
    pub statement: PathBuf,
    pub format: BankFormat,
    /// Incoming lines (refunds, salary...) left out of matching
    pub credits_skipped: usize,
    pub report: ReconciliationReport,
}

/// Processing strategy trait for complete reconciliation pipelines
///
/// Each strategy must be able to load the ledger, read every statement of the
/// job, reconcile them, and write the discrepancy report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Reconcile every statement of `job` and write the discrepancies to `output`
    ///
    /// # Arguments
    ///
    /// * `job` - Statement files, ledger file and mapping policy
    /// * `output` - Writer receiving the discrepancy CSV
    ///
    /// # Returns
    ///
    /// * `Ok(reports)` with one report per statement, in job order
    /// * `Err(ReconcileError)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A statement or the ledger cannot be opened
    /// - A statement has no recognizable header
    /// - A ledger row is invalid under [`MappingPolicy::Abort`]
    /// - Output cannot be written
    ///
    /// Malformed statement lines are logged and skipped; they do not fail the job.
    fn process(
        &self,
        job: &ReconcileJob,
        output: &mut dyn Write,
    ) -> Result<Vec<StatementReport>, ReconcileError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional run configuration for the async strategy (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<RunConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Read and normalize the ledger database of a job
pub(crate) fn load_ledger(
    path: &Path,
    policy: MappingPolicy,
) -> Result<Vec<LedgerTransaction>, ReconcileError> {
    read_ledger(&LedgerDatabase::open(path)?, policy)
}

/// Read and normalize the rows of any ledger source
pub(crate) fn read_ledger<S: LedgerSource + ?Sized>(
    source: &S,
    policy: MappingPolicy,
) -> Result<Vec<LedgerTransaction>, ReconcileError> {
    let rows = source.read_rows()?;
    let transactions = normalize(&rows, policy)?;

    tracing::info!(
        rows = rows.len(),
        usable = transactions.len(),
        "Loaded ledger"
    );
    Ok(transactions)
}

/// Reconcile the lines of one statement against a fresh index over `ledger`
pub(crate) fn reconcile_statement(
    statement: &Path,
    format: BankFormat,
    transactions: Vec<BankTransaction>,
    ledger: &[LedgerTransaction],
) -> Result<StatementReport, ReconcileError> {
    let (debits, credits): (Vec<_>, Vec<_>) =
        transactions.into_iter().partition(BankTransaction::is_debit);

    let index = ReconciliationIndex::build(ledger.iter().cloned());
    let report = reconcile(&debits, index)?;

    tracing::info!(
        statement = %statement.display(),
        %format,
        matched = report.matches.len(),
        discrepancies = report.discrepancies.len(),
        residue = report.residue.len(),
        credits_skipped = credits.len(),
        "Reconciled statement"
    );

    Ok(StatementReport {
        statement: statement.to_path_buf(),
        format,
        credits_skipped: credits.len(),
        report,
    })
}

/// Write the discrepancy report shared by all strategies
pub(crate) fn write_report(
    reports: &[StatementReport],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    write_discrepancies_csv(reports, output).map_err(|message| ReconcileError::IoError { message })
}
