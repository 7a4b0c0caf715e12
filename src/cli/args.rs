use crate::core::MappingPolicy;
use crate::strategy::{ReconcileJob, RunConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Reconcile bank statements against an Expense Manager ledger
#[derive(Parser, Debug)]
#[command(name = "expense-tally")]
#[command(
    about = "Reconcile bank statements against an Expense Manager ledger",
    long_about = None
)]
pub struct CliArgs {
    /// Bank statement CSV files to reconcile
    #[arg(
        value_name = "STATEMENT",
        required = true,
        env = "CSV_LOCAL_FILE_PATH",
        help = "Bank statement CSV files (DBS or credit card export)"
    )]
    pub statements: Vec<PathBuf>,

    /// Expense Manager SQLite database
    #[arg(
        long = "ledger",
        value_name = "PATH",
        env = "EXPENSE_MANAGER_LOCAL_FILE_PATH",
        help = "Path to the Expense Manager database file"
    )]
    pub ledger: PathBuf,

    /// Processing strategy to use for the reconciliation runs
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent runs"
    )]
    pub strategy: StrategyType,

    /// Maximum number of concurrent runs (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of statements reconciled concurrently (default: CPU cores)"
    )]
    pub max_concurrent_runs: Option<usize>,

    /// Number of statement lines read per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of statement lines read per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// What to do with ledger rows that cannot be mapped
    #[arg(
        long = "on-invalid-row",
        value_name = "POLICY",
        default_value = "skip",
        help = "Invalid ledger rows: 'skip' logs and ignores them, 'abort' fails the run"
    )]
    pub on_invalid_row: MappingPolicy,

    /// Discrepancy report destination
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        help = "Write the discrepancy CSV to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Residue report destination
    #[arg(
        long = "residue",
        value_name = "PATH",
        help = "Also write ledger entries left unmatched by each statement"
    )]
    pub residue: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a RunConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// the defaults with a warning.
    pub fn to_run_config(&self) -> RunConfig {
        if self.max_concurrent_runs.is_some() || self.batch_size.is_some() {
            let default = RunConfig::default();
            RunConfig::new(
                self.max_concurrent_runs
                    .unwrap_or(default.max_concurrent_runs),
                self.batch_size.unwrap_or(default.batch_size),
            )
        } else {
            RunConfig::default()
        }
    }

    /// Create the job description from CLI arguments
    pub fn to_job(&self) -> ReconcileJob {
        ReconcileJob {
            statements: self.statements.clone(),
            ledger: self.ledger.clone(),
            policy: self.on_invalid_row,
        }
    }
}
