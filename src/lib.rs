//! Expense Tally Library
//! # Overview
//!
//! This library reconciles bank statement transactions against the entries of
//! an Expense Manager ledger and reports the bank transactions that were never
//! recorded.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Amount, PaymentMethod, transactions, reports)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::normalizer`] - Mapping raw ledger rows into canonical transactions
//!   - [`core::index`] - Ledger lookup index keyed by amount and payment method
//!   - [`core::matcher`] - Consuming the index with bank transactions
//!   - [`core::classifier`] - Deriving payment methods from statement lines
//! - [`io`] - Statement readers, ledger database access and report writers
//! - [`strategy`] - Sync and async pipelines over whole jobs
//!
//! # Matching Rules
//!
//! A bank transaction matches a ledger transaction when both carry exactly the
//! same amount and payment method. Each ledger transaction is consumed at most
//! once; among equal candidates the earliest ledger entry is consumed first.
//!
//! # Outcomes
//!
//! Every run produces:
//! - `matches`: bank transactions paired with the ledger entry they consumed
//! - `discrepancies`: bank transactions with no ledger entry (or no derivable
//!   payment method)
//! - `residue`: ledger entries no bank transaction consumed
//!
//! ```
//! use expense_tally::core::{reconcile, ReconciliationIndex};
//! use expense_tally::types::{Amount, BankTransaction, CardTransaction};
//! use chrono::NaiveDate;
//!
//! let statement = vec![BankTransaction::Card(CardTransaction {
//!     date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!     description: "NETFLIX.COM".to_string(),
//!     amount: Amount::from_minor(1598),
//! })];
//!
//! let report = reconcile(&statement, ReconciliationIndex::new()).unwrap();
//! assert_eq!(report.discrepancies.len(), 1);
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{normalize, reconcile, MappingPolicy, Matcher, ReconciliationIndex};
pub use io::{write_discrepancies_csv, write_residue_csv};
pub use types::{
    Amount, BankTransaction, DiscrepancyReason, LedgerTransaction, PaymentMethod, ReconcileError,
    ReconciliationReport,
};
