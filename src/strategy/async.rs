//! Asynchronous concurrent processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Statements of a job are read and reconciled
//! concurrently, each as an independent run.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── RunConfig (max_concurrent_runs, batch_size)
//!     ├── spawn_blocking: LedgerDatabase + normalize (once per job)
//!     └── per statement task (at most max_concurrent_runs at a time)
//!         ├── AsyncStatementReader (batch CSV reading)
//!         └── reconcile against a fresh index over the shared ledger snapshot
//! ```
//!
//! # Ordering
//!
//! Runs complete in any order but `buffered` yields them in job order, so the
//! reports and the discrepancy output match the sync strategy exactly.

use crate::io::async_reader::AsyncStatementReader;
use crate::strategy::{
    load_ledger, reconcile_statement, write_report, ProcessingStrategy, ReconcileJob,
    StatementReport,
};
use crate::types::{LedgerTransaction, ReconcileError};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for concurrent processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of statements reconciled concurrently
    pub max_concurrent_runs: usize,
    /// Number of statement lines read per batch
    pub batch_size: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: num_cpus::get(),
            batch_size: 1000,
        }
    }
}

impl RunConfig {
    /// Create a new RunConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(max_concurrent_runs: usize, batch_size: usize) -> Self {
        let default = Self::default();

        let max_concurrent_runs = if max_concurrent_runs == 0 {
            tracing::warn!(
                default = default.max_concurrent_runs,
                "Invalid max_concurrent_runs (0), using default"
            );
            default.max_concurrent_runs
        } else {
            max_concurrent_runs
        };

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "Invalid batch_size (0), using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        Self {
            max_concurrent_runs,
            batch_size,
        }
    }
}

/// Asynchronous concurrent processing strategy
///
/// The ledger is read once on a blocking thread and shared read-only between
/// runs. Each run builds and consumes its own index.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: RunConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    ///
    /// Zero values in `config` fall back to the defaults, as in [`RunConfig::new`].
    pub fn new(config: RunConfig) -> Self {
        Self {
            config: RunConfig::new(config.max_concurrent_runs, config.batch_size),
        }
    }
}

async fn run_statement(
    statement: PathBuf,
    ledger: Arc<Vec<LedgerTransaction>>,
    batch_size: usize,
) -> Result<StatementReport, ReconcileError> {
    let mut reader = AsyncStatementReader::open(&statement).await?;
    let format = reader.format();
    let transactions = reader.read_all(batch_size).await?;

    reconcile_statement(&statement, format, transactions, &ledger)
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Reconcile the statements of the job concurrently
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads and normalizes the ledger in `spawn_blocking`
    /// 3. Spawns one task per statement, at most `max_concurrent_runs` at a time
    /// 4. Collects the reports in job order
    /// 5. Writes the discrepancies of all statements to output
    fn process(
        &self,
        job: &ReconcileJob,
        output: &mut dyn Write,
    ) -> Result<Vec<StatementReport>, ReconcileError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_runs)
            .enable_all()
            .build()
            .map_err(|e| {
                ReconcileError::task_failed(&format!("Failed to create tokio runtime: {}", e))
            })?;

        let reports = runtime.block_on(async {
            let ledger_path = job.ledger.clone();
            let policy = job.policy;
            let ledger = tokio::task::spawn_blocking(move || load_ledger(&ledger_path, policy))
                .await
                .map_err(|e| ReconcileError::task_failed(&e.to_string()))??;
            let ledger = Arc::new(ledger);
            let batch_size = self.config.batch_size;

            stream::iter(job.statements.clone())
                .map(|statement| {
                    tokio::spawn(run_statement(statement, Arc::clone(&ledger), batch_size))
                })
                .buffered(self.config.max_concurrent_runs)
                .map(|joined| {
                    joined
                        .map_err(|e| ReconcileError::task_failed(&e.to_string()))
                        .and_then(|result| result)
                })
                .try_collect::<Vec<_>>()
                .await
        })?;

        write_report(&reports, output)?;
        Ok(reports)
    }
}
