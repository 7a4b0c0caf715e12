//! Reconciliation outcome types
//!
//! Everything a run produces is returned as values: matched pairs, discrepant
//! bank transactions, and the ledger residue left in the index.

use super::payment_method::PaymentMethod;
use super::transaction::{BankTransaction, LedgerTransaction};
use serde::Serialize;
use std::fmt;

/// Why a bank transaction could not be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyReason {
    /// No unconsumed ledger entry shares the transaction's amount and payment method
    NoMatchingLedgerEntry,

    /// The bank transaction could not be classified into any payment method
    UnclassifiedPaymentMethod,
}

impl DiscrepancyReason {
    /// Stable machine-readable code used in report files
    pub fn code(&self) -> &'static str {
        match self {
            DiscrepancyReason::NoMatchingLedgerEntry => "no_matching_ledger_entry",
            DiscrepancyReason::UnclassifiedPaymentMethod => "unclassified_payment_method",
        }
    }
}

impl fmt::Display for DiscrepancyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscrepancyReason::NoMatchingLedgerEntry => {
                f.write_str("no ledger entry with matching amount and payment method")
            }
            DiscrepancyReason::UnclassifiedPaymentMethod => {
                f.write_str("payment method could not be derived from the bank transaction")
            }
        }
    }
}

/// A bank transaction with no corresponding ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscrepantTransaction {
    pub transaction: BankTransaction,

    /// The classification used for the lookup, if one could be derived
    pub payment_method: Option<PaymentMethod>,

    pub reason: DiscrepancyReason,
}

/// A bank transaction paired with the ledger entry it consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedTransaction {
    pub bank: BankTransaction,
    pub ledger: LedgerTransaction,
}

/// Result of one reconciliation run
///
/// `matches` and `discrepancies` follow the order of the bank transactions
/// given to the run. `residue` holds the ledger transactions that no bank
/// transaction consumed, in ledger input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReconciliationReport {
    pub matches: Vec<MatchedTransaction>,
    pub discrepancies: Vec<DiscrepantTransaction>,
    pub residue: Vec<LedgerTransaction>,
}

impl ReconciliationReport {
    /// Number of bank transactions the run looked at
    pub fn bank_count(&self) -> usize {
        self.matches.len() + self.discrepancies.len()
    }

    /// Number of ledger transactions the run was given
    pub fn ledger_count(&self) -> usize {
        self.matches.len() + self.residue.len()
    }

    /// True when every bank transaction found a ledger entry
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}
