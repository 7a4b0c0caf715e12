//! Expense Tally CLI
//!
//! Command-line interface for reconciling bank statements against an Expense
//! Manager ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --ledger expensemanager.db statement.csv > discrepancies.csv
//! cargo run -- --ledger expensemanager.db --strategy async jan.csv feb.csv mar.csv
//! cargo run -- --ledger expensemanager.db --residue residue.csv -o discrepancies.csv card.csv
//! RUST_LOG=info cargo run -- --ledger expensemanager.db --on-invalid-row abort statement.csv
//! ```
//!
//! The program reads the ledger, reconciles every statement file against it
//! and writes the bank transactions with no ledger entry as CSV to stdout (or
//! `--output`). Logs go to stderr.
//!
//! # Processing Strategies
//!
//! - **sync**: Statements reconciled one after another (default)
//! - **async**: Statements read and reconciled concurrently
//!
//! # Exit Codes
//!
//! - 0: Success (discrepancies found or not)
//! - 1: Error (missing arguments, file not found, invalid ledger row under `abort`, etc.)

use expense_tally::cli;
use expense_tally::io::write_residue_csv;
use expense_tally::strategy::{self, StatementReport};
use expense_tally::types::ReconcileError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn create_output(path: &Path) -> Result<BufWriter<File>, ReconcileError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ReconcileError::IoError {
            message: format!("Failed to create '{}': {}", path.display(), e),
        })
}

fn run(args: &cli::CliArgs) -> Result<Vec<StatementReport>, ReconcileError> {
    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_run_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let job = args.to_job();
    let reports = match &args.output {
        Some(path) => {
            let mut output = create_output(path)?;
            let reports = strategy.process(&job, &mut output)?;
            output.flush()?;
            reports
        }
        None => strategy.process(&job, &mut std::io::stdout())?,
    };

    if let Some(path) = &args.residue {
        let mut output = create_output(path)?;
        write_residue_csv(&reports, &mut output)
            .map_err(|message| ReconcileError::IoError { message })?;
        output.flush()?;
    }

    Ok(reports)
}

fn main() {
    // Parse command-line arguments (after loading .env) using clap
    let args = cli::parse_args();

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(reports) => {
            let discrepancies: usize = reports
                .iter()
                .map(|r| r.report.discrepancies.len())
                .sum();
            tracing::info!(
                statements = reports.len(),
                discrepancies,
                "Reconciliation finished"
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
