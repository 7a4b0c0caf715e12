//! Benchmark suite for the reconciliation pipeline
//!
//! Measures index construction, matching, statement parsing and the two
//! processing strategies using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! Inputs are generated in memory (or in a temporary directory for the
//! strategy benchmarks): a ledger of `n` entries spread over every payment
//! method and a card statement of `n` lines, half of which have a ledger entry.

use chrono::NaiveDate;
use divan::Bencher;
use expense_tally::cli::StrategyType;
use expense_tally::core::{reconcile, MappingPolicy, ReconciliationIndex};
use expense_tally::io::StatementReader;
use expense_tally::strategy::{create_strategy, ReconcileJob, RunConfig};
use expense_tally::types::{Amount, BankTransaction, CardTransaction, LedgerTransaction, PaymentMethod};
use rusqlite::Connection;
use std::fmt::Write as _;
use tempfile::TempDir;

const SIZES: [usize; 3] = [100, 1_000, 100_000];

fn main() {
    divan::main();
}

fn ledger(n: usize) -> Vec<LedgerTransaction> {
    (0..n)
        .map(|i| LedgerTransaction {
            id: i as i64,
            amount: Amount::from_minor((i % 5_000) as i64 + 100),
            payment_method: PaymentMethod::ALL[i % PaymentMethod::ALL.len()],
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            description: format!("entry {}", i),
            category: "Misc".to_string(),
            subcategory: String::new(),
            account: "Personal".to_string(),
        })
        .collect()
}

fn card_statement(n: usize) -> Vec<BankTransaction> {
    (0..n)
        .map(|i| {
            BankTransaction::Card(CardTransaction {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                description: format!("MERCHANT {}", i),
                amount: Amount::from_minor((i % 5_000) as i64 + 100),
            })
        })
        .collect()
}

fn card_csv(n: usize) -> String {
    let mut csv = String::from("Date,Description,Amount\n");
    for i in 0..n {
        let _ = writeln!(csv, "2024-03-02,MERCHANT {},{}", i, Amount::from_minor((i % 5_000) as i64 + 100));
    }
    csv
}

/// Build a ledger of `n` entries
#[divan::bench(args = SIZES)]
fn build_index(bencher: Bencher, n: usize) {
    bencher
        .with_inputs(|| ledger(n))
        .bench_values(ReconciliationIndex::build);
}

/// Match a card statement of `n` lines against a ledger of `n` entries
#[divan::bench(args = SIZES)]
fn reconcile_card_statement(bencher: Bencher, n: usize) {
    let statement = card_statement(n);

    bencher
        .with_inputs(|| ReconciliationIndex::build(ledger(n)))
        .bench_values(|index| reconcile(&statement, index).expect("Reconciliation failed"));
}

/// Parse a card statement of `n` lines
#[divan::bench(args = SIZES)]
fn parse_card_statement(bencher: Bencher, n: usize) {
    let csv = card_csv(n);

    bencher.bench(|| {
        StatementReader::from_reader(csv.as_bytes(), "bench")
            .expect("Unrecognized statement")
            .filter_map(Result::ok)
            .count()
    });
}

fn strategy_fixture(n: usize, statements: usize) -> (TempDir, ReconcileJob) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let ledger_path = dir.path().join("expensemanager.db");
    let mut conn = Connection::open(&ledger_path).expect("Failed to create ledger");
    conn.execute_batch(
        "CREATE TABLE expense_report (_id INTEGER PRIMARY KEY, account TEXT, amount TEXT,
         category TEXT, subcategory TEXT, payment_method TEXT, description TEXT,
         expensed_time INTEGER, referenceNumber TEXT);",
    )
    .expect("Failed to create schema");

    let tx = conn.transaction().expect("Failed to start transaction");
    for entry in ledger(n) {
        tx.execute(
            "INSERT INTO expense_report VALUES (?1, 'Personal', ?2, 'Misc', '', ?3, ?4, 1709251200000, '')",
            rusqlite::params![
                entry.id,
                entry.amount.to_string(),
                entry.payment_method.label(),
                entry.description
            ],
        )
        .expect("Failed to insert ledger row");
    }
    tx.commit().expect("Failed to commit ledger");

    let csv = card_csv(n);
    let statement_paths = (0..statements)
        .map(|i| {
            let path = dir.path().join(format!("statement_{}.csv", i));
            std::fs::write(&path, &csv).expect("Failed to write statement");
            path
        })
        .collect();

    let job = ReconcileJob {
        statements: statement_paths,
        ledger: ledger_path,
        policy: MappingPolicy::Skip,
    };
    (dir, job)
}

/// Sync strategy over four statements of 1,000 lines
#[divan::bench]
fn sync_strategy(bencher: Bencher) {
    let (_dir, job) = strategy_fixture(1_000, 4);
    let strategy = create_strategy(StrategyType::Sync, None);

    bencher.bench(|| {
        strategy
            .process(&job, &mut Vec::new())
            .expect("Processing failed")
    });
}

/// Async strategy over four statements of 1,000 lines
#[divan::bench]
fn async_strategy(bencher: Bencher) {
    let (_dir, job) = strategy_fixture(1_000, 4);
    let strategy = create_strategy(StrategyType::Async, Some(RunConfig::default()));

    bencher.bench(|| {
        strategy
            .process(&job, &mut Vec::new())
            .expect("Processing failed")
    });
}
