//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `money`: Exact monetary amounts used as lookup keys
//! - `payment_method`: The closed set of payment channels
//! - `transaction`: Bank, ledger and persisted row types
//! - `report`: Reconciliation outcomes (matches, discrepancies, residue)
//! - `error`: Error types for the reconciliation engine

pub mod error;
pub mod money;
pub mod payment_method;
pub mod report;
pub mod transaction;

pub use error::ReconcileError;
pub use money::Amount;
pub use payment_method::PaymentMethod;
pub use report::{
    DiscrepancyReason, DiscrepantTransaction, MatchedTransaction, ReconciliationReport,
};
pub use transaction::{
    BankFormat, BankTransaction, CardTransaction, DbsTransaction, LedgerId, LedgerTransaction,
    PersistedRow,
};
