//! Ledger row normalization
//!
//! This module maps raw `expense_report` rows into canonical
//! [`LedgerTransaction`] values. Only the amount and the payment method are
//! required; an absent or unrepresentable expense time leaves the entry
//! undated. The only side effects are `warn` log lines for undated rows and
//! for rows rejected under [`MappingPolicy::Skip`].

use crate::types::{Amount, LedgerTransaction, PaymentMethod, PersistedRow, ReconcileError};
use chrono::DateTime;
use clap::ValueEnum;

/// What to do with a ledger row that cannot be mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MappingPolicy {
    /// Log the row and leave it out of the run
    #[default]
    Skip,
    /// Fail the whole run with the row's validation error
    Abort,
}

/// Map one persisted row into a canonical ledger transaction
///
/// # Errors
///
/// Returns a validation error if:
/// - The amount is absent, blank, or not a decimal number
/// - The payment method is absent, blank, or outside the supported set
pub fn normalize_row(row: &PersistedRow) -> Result<LedgerTransaction, ReconcileError> {
    let record = format!("ledger row {}", row.id);

    let amount = match row.amount.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Amount>()
            .map_err(|_| ReconcileError::invalid_amount(raw, &record))?,
        _ => return Err(ReconcileError::missing_amount(&record)),
    };

    let payment_method = match row.payment_method.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<PaymentMethod>()
            .map_err(|_| ReconcileError::unknown_payment_method(raw, &record))?,
        _ => return Err(ReconcileError::missing_payment_method(&record)),
    };

    let date = row
        .expensed_at
        .and_then(DateTime::from_timestamp_millis)
        .map(|time| time.date_naive());
    if date.is_none() {
        tracing::warn!(row = row.id, expensed_at = ?row.expensed_at, "Ledger row has no usable expense time");
    }

    Ok(LedgerTransaction {
        id: row.id,
        amount,
        payment_method,
        date,
        description: row.description.trim().to_string(),
        category: row.category.trim().to_string(),
        subcategory: row.subcategory.trim().to_string(),
        account: row.account.trim().to_string(),
    })
}

/// Map persisted rows into canonical ledger transactions
///
/// Output order matches input order. Rows that fail to map are handled
/// according to `policy`.
///
/// # Errors
///
/// Under [`MappingPolicy::Abort`], returns the first row's validation error.
/// Under [`MappingPolicy::Skip`], never fails.
pub fn normalize(
    rows: &[PersistedRow],
    policy: MappingPolicy,
) -> Result<Vec<LedgerTransaction>, ReconcileError> {
    let mut transactions = Vec::with_capacity(rows.len());

    for row in rows {
        match normalize_row(row) {
            Ok(transaction) => transactions.push(transaction),
            Err(e) => match policy {
                MappingPolicy::Skip => {
                    tracing::warn!(row = row.id, error = %e, "Skipping ledger row");
                }
                MappingPolicy::Abort => return Err(e),
            },
        }
    }

    Ok(transactions)
}
