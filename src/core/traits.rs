//! Core traits for reconciliation
//!
//! This module defines the trait abstractions that let callers swap the rules
//! used to interpret bank transactions without touching the matcher.

use crate::types::{BankTransaction, PaymentMethod};

/// Trait for deriving the payment method of a bank transaction
///
/// The derivation depends on the bank export format and on which account the
/// statement belongs to, so it lives outside the matcher. Returning `None`
/// marks the transaction as unclassifiable; the matcher then reports it as a
/// discrepancy instead of failing.
pub trait PaymentMethodClassifier {
    /// Classify a single bank transaction
    fn classify(&self, transaction: &BankTransaction) -> Option<PaymentMethod>;
}

impl<C: PaymentMethodClassifier + ?Sized> PaymentMethodClassifier for &C {
    fn classify(&self, transaction: &BankTransaction) -> Option<PaymentMethod> {
        (**self).classify(transaction)
    }
}
