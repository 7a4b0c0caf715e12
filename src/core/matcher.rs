//! Bank-to-ledger matching
//!
//! This module provides the Matcher that consumes bank transactions against a
//! [`ReconciliationIndex`] and collects the ones that have no ledger entry.
//!
//! The matcher enforces:
//! - At most one ledger transaction per bank transaction, and vice versa
//! - FIFO consumption among ledger entries sharing a key
//! - Exact amount and payment method equality (no tolerance, no fuzzy matching)
//!
//! A bank transaction that cannot be classified is a discrepancy, not an
//! error. A bank transaction with no amount at all is a validation error and
//! stops the run.

use crate::core::classifier::StatementClassifier;
use crate::core::index::ReconciliationIndex;
use crate::core::traits::PaymentMethodClassifier;
use crate::types::{
    BankTransaction, DiscrepancyReason, DiscrepantTransaction, MatchedTransaction, PaymentMethod,
    ReconcileError, ReconciliationReport,
};

/// What happened to a single bank transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A ledger entry was consumed
    Matched,
    /// The transaction was recorded as a discrepancy
    Discrepant(DiscrepancyReason),
}

/// Matching state for one reconciliation run
///
/// Owns the index it consumes, so an index can never be shared between runs.
pub struct Matcher<C = StatementClassifier> {
    index: ReconciliationIndex,
    classifier: C,
    matches: Vec<MatchedTransaction>,
    discrepancies: Vec<DiscrepantTransaction>,
}

impl Matcher<StatementClassifier> {
    /// Create a matcher using the default statement classifier
    pub fn new(index: ReconciliationIndex) -> Self {
        Matcher::with_classifier(index, StatementClassifier)
    }
}

impl<C: PaymentMethodClassifier> Matcher<C> {
    /// Create a matcher with custom payment method rules
    pub fn with_classifier(index: ReconciliationIndex, classifier: C) -> Self {
        Matcher {
            index,
            classifier,
            matches: Vec::new(),
            discrepancies: Vec::new(),
        }
    }

    /// Match a single bank transaction
    ///
    /// Derives the amount and payment method, then consumes the earliest
    /// ledger entry with the same key. When there is no classification or no
    /// candidate, the transaction is recorded as a discrepancy and the index
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::MissingAmount` if the transaction carries no
    /// amount. Nothing is recorded for that transaction.
    pub fn process(&mut self, transaction: &BankTransaction) -> Result<MatchOutcome, ReconcileError> {
        let amount = transaction.amount()?;

        let Some(method) = self.classifier.classify(transaction) else {
            return Ok(self.record_discrepancy(
                transaction,
                None,
                DiscrepancyReason::UnclassifiedPaymentMethod,
            ));
        };

        match self.index.take(amount, method) {
            Some(ledger) => {
                self.matches.push(MatchedTransaction {
                    bank: transaction.clone(),
                    ledger,
                });
                Ok(MatchOutcome::Matched)
            }
            None => Ok(self.record_discrepancy(
                transaction,
                Some(method),
                DiscrepancyReason::NoMatchingLedgerEntry,
            )),
        }
    }

    fn record_discrepancy(
        &mut self,
        transaction: &BankTransaction,
        payment_method: Option<PaymentMethod>,
        reason: DiscrepancyReason,
    ) -> MatchOutcome {
        self.discrepancies.push(DiscrepantTransaction {
            transaction: transaction.clone(),
            payment_method,
            reason,
        });
        MatchOutcome::Discrepant(reason)
    }

    /// Ledger entries not consumed so far
    pub fn remaining(&self) -> &ReconciliationIndex {
        &self.index
    }

    /// Discrepancies recorded so far, in processing order
    pub fn discrepancies(&self) -> &[DiscrepantTransaction] {
        &self.discrepancies
    }

    /// Finish the run, turning the remaining index content into the residue
    pub fn finish(self) -> ReconciliationReport {
        ReconciliationReport {
            matches: self.matches,
            discrepancies: self.discrepancies,
            residue: self.index.into_residue(),
        }
    }
}

/// Reconcile bank transactions against a ledger index with the default classifier
///
/// Bank transactions are processed in input order.
///
/// # Errors
///
/// Fails fast with `ReconcileError::MissingAmount` on a bank transaction
/// without an amount; the partially consumed index is dropped.
pub fn reconcile(
    bank_transactions: &[BankTransaction],
    index: ReconciliationIndex,
) -> Result<ReconciliationReport, ReconcileError> {
    reconcile_with(bank_transactions, index, StatementClassifier)
}

/// Reconcile bank transactions against a ledger index with custom classification rules
pub fn reconcile_with<C: PaymentMethodClassifier>(
    bank_transactions: &[BankTransaction],
    index: ReconciliationIndex,
    classifier: C,
) -> Result<ReconciliationReport, ReconcileError> {
    let mut matcher = Matcher::with_classifier(index, classifier);

    for transaction in bank_transactions {
        matcher.process(transaction)?;
    }

    Ok(matcher.finish())
}
