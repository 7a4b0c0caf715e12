//! Ledger lookup index
//!
//! This module provides the ReconciliationIndex that groups ledger
//! transactions by their exact `(amount, payment method)` pair. The matcher
//! consumes entries from it; whatever remains afterwards is the ledger residue.
//!
//! # Bucket Order
//!
//! Each bucket is a FIFO queue in ledger input order. When several ledger
//! entries share a key, the earliest inserted one is consumed first, which
//! keeps repeated runs over the same inputs identical.
//!
//! # Empty Buckets
//!
//! A bucket is removed as soon as its last entry is taken, so the index never
//! holds keys without candidates.

use crate::types::{Amount, LedgerTransaction, PaymentMethod};
use std::collections::{HashMap, VecDeque};

/// Composite lookup key
pub type IndexKey = (Amount, PaymentMethod);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Position in the ledger input, used to restore order for the residue
    position: usize,
    transaction: LedgerTransaction,
}

/// Ledger transactions indexed by amount and payment method
///
/// Built once per reconciliation run and mutated while matching. It is not
/// meant to be shared between runs; each run builds its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationIndex {
    buckets: HashMap<IndexKey, VecDeque<Entry>>,
    len: usize,
    next_position: usize,
}

impl ReconciliationIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        ReconciliationIndex {
            buckets: HashMap::new(),
            len: 0,
            next_position: 0,
        }
    }

    /// Build an index from ledger transactions in one pass
    ///
    /// Within each bucket, insertion order matches input order.
    pub fn build<I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = LedgerTransaction>,
    {
        let mut index = Self::new();
        for transaction in transactions {
            index.insert(transaction);
        }
        index
    }

    /// Append a ledger transaction to the back of its bucket
    pub fn insert(&mut self, transaction: LedgerTransaction) {
        let key = (transaction.amount, transaction.payment_method);
        let entry = Entry {
            position: self.next_position,
            transaction,
        };

        self.buckets.entry(key).or_default().push_back(entry);
        self.next_position += 1;
        self.len += 1;
    }

    /// Remove and return the earliest inserted transaction for a key
    ///
    /// Returns `None` (and leaves the index untouched) when no transaction
    /// with this amount and payment method remains.
    pub fn take(&mut self, amount: Amount, method: PaymentMethod) -> Option<LedgerTransaction> {
        let key = (amount, method);
        let bucket = self.buckets.get_mut(&key)?;
        let entry = bucket.pop_front()?;

        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.len -= 1;

        Some(entry.transaction)
    }

    /// Iterate over the remaining candidates for a key, in consumption order
    pub fn candidates(
        &self,
        amount: Amount,
        method: PaymentMethod,
    ) -> impl Iterator<Item = &LedgerTransaction> + '_ {
        self.buckets
            .get(&(amount, method))
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(|entry| &entry.transaction))
    }

    /// Number of transactions not yet consumed
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty `(amount, payment method)` buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Borrow the remaining transactions in ledger input order
    pub fn residue(&self) -> Vec<&LedgerTransaction> {
        let mut entries: Vec<&Entry> = self.buckets.values().flatten().collect();
        entries.sort_by_key(|entry| entry.position);
        entries.into_iter().map(|entry| &entry.transaction).collect()
    }

    /// Consume the index, returning the remaining transactions in ledger input order
    pub fn into_residue(self) -> Vec<LedgerTransaction> {
        let mut entries: Vec<Entry> = self.buckets.into_values().flatten().collect();
        entries.sort_by_key(|entry| entry.position);
        entries.into_iter().map(|entry| entry.transaction).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger(id: i64, minor: i64, method: PaymentMethod) -> LedgerTransaction {
        LedgerTransaction {
            id,
            amount: Amount::from_minor(minor),
            payment_method: method,
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            description: format!("entry {}", id),
            category: "Food".to_string(),
            subcategory: String::new(),
            account: "Personal".to_string(),
        }
    }

    #[test]
    fn test_build_groups_by_amount_and_method() {
        let index = ReconciliationIndex::build(vec![
            ledger(1, 1250, PaymentMethod::CreditCard),
            ledger(2, 1250, PaymentMethod::Cash),
            ledger(3, 1250, PaymentMethod::CreditCard),
            ledger(4, 999, PaymentMethod::Cash),
        ]);

        assert_eq!(index.len(), 4);
        assert_eq!(index.bucket_count(), 3);

        let ids: Vec<_> = index
            .candidates(Amount::from_minor(1250), PaymentMethod::CreditCard)
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_take_is_fifo() {
        let mut index = ReconciliationIndex::build(vec![
            ledger(1, 500, PaymentMethod::Nets),
            ledger(2, 500, PaymentMethod::Nets),
            ledger(3, 500, PaymentMethod::Nets),
        ]);

        let taken: Vec<_> = std::iter::from_fn(|| {
            index.take(Amount::from_minor(500), PaymentMethod::Nets)
        })
        .map(|tx| tx.id)
        .collect();

        assert_eq!(taken, vec![1, 2, 3]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_take_removes_exhausted_bucket() {
        let mut index = ReconciliationIndex::build(vec![
            ledger(1, 500, PaymentMethod::Nets),
            ledger(2, 700, PaymentMethod::Nets),
        ]);

        assert!(index.take(Amount::from_minor(500), PaymentMethod::Nets).is_some());

        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.len(), 1);
        assert!(index.take(Amount::from_minor(500), PaymentMethod::Nets).is_none());
    }

    #[test]
    fn test_take_missing_key_leaves_index_unchanged() {
        let mut index = ReconciliationIndex::build(vec![ledger(1, 999, PaymentMethod::Cash)]);
        let before = index.clone();

        assert!(index
            .take(Amount::from_minor(999), PaymentMethod::CreditCard)
            .is_none());
        assert!(index.take(Amount::from_minor(998), PaymentMethod::Cash).is_none());

        assert_eq!(index, before);
    }

    #[test]
    fn test_key_ignores_decimal_scale() {
        let mut first = ledger(1, 0, PaymentMethod::Cash);
        first.amount = "12.5".parse().unwrap();
        let mut index = ReconciliationIndex::build(vec![first]);

        assert!(index
            .take("12.50".parse().unwrap(), PaymentMethod::Cash)
            .is_some());
    }

    #[test]
    fn test_residue_is_in_input_order() {
        let mut index = ReconciliationIndex::build(vec![
            ledger(10, 100, PaymentMethod::Cash),
            ledger(11, 200, PaymentMethod::Giro),
            ledger(12, 100, PaymentMethod::Cash),
            ledger(13, 300, PaymentMethod::DebitCard),
        ]);

        index.take(Amount::from_minor(100), PaymentMethod::Cash);

        let borrowed: Vec<_> = index.residue().iter().map(|tx| tx.id).collect();
        assert_eq!(borrowed, vec![11, 12, 13]);

        let owned: Vec<_> = index.into_residue().into_iter().map(|tx| tx.id).collect();
        assert_eq!(owned, vec![11, 12, 13]);
    }

    #[test]
    fn test_len_tracks_bucket_sizes() {
        let mut index = ReconciliationIndex::new();
        for id in 0..20 {
            let method = PaymentMethod::ALL[id as usize % PaymentMethod::ALL.len()];
            index.insert(ledger(id, 100 + id % 3, method));
        }

        index.take(Amount::from_minor(100), PaymentMethod::Cash);
        index.take(Amount::from_minor(101), PaymentMethod::CreditCard);

        let bucket_total: usize = PaymentMethod::ALL
            .iter()
            .flat_map(|method| (100..103).map(move |minor| (minor, *method)))
            .map(|(minor, method)| index.candidates(Amount::from_minor(minor), method).count())
            .sum();

        assert_eq!(index.len(), bucket_total);
        assert_eq!(index.len(), 18);
    }

    #[test]
    fn test_empty_index() {
        let index = ReconciliationIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 0);
        assert!(index.into_residue().is_empty());
    }
}
