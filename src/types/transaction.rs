//! Transaction-related types for expense reconciliation
//!
//! This module defines the two sides of a reconciliation run:
//! - [`BankTransaction`]: one line of a bank-issued statement, in one of the
//!   supported export formats
//! - [`LedgerTransaction`]: one canonical entry of the Expense Manager ledger,
//!   produced from a [`PersistedRow`] by the normalizer

use super::error::ReconcileError;
use super::money::Amount;
use super::payment_method::PaymentMethod;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Ledger row identifier (the `_id` column of the ledger database)
pub type LedgerId = i64;

/// Supported bank statement export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BankFormat {
    /// DBS/POSB current and savings account export
    Dbs,
    /// Credit card statement export
    Card,
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFormat::Dbs => f.write_str("dbs"),
            BankFormat::Card => f.write_str("card"),
        }
    }
}

/// A line of a DBS account statement
///
/// DBS exports carry separate debit and credit columns. Exactly one of them is
/// normally filled; the reference code identifies the payment channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbsTransaction {
    pub date: NaiveDate,

    /// Transaction code such as `MST` (debit card) or `ICT` (FAST transfer)
    pub reference: String,

    /// Money leaving the account
    pub debit_amount: Option<Amount>,

    /// Money entering the account
    pub credit_amount: Option<Amount>,

    /// Transaction reference columns joined with a single space
    pub description: String,
}

/// A line of a credit card statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTransaction {
    pub date: NaiveDate,
    pub description: String,

    /// Signed amount: charges are positive, payments and refunds negative
    pub amount: Amount,
}

/// A transaction line extracted from a bank statement
///
/// Immutable once parsed. Each variant carries what is needed to derive the
/// matching amount and the payment method classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum BankTransaction {
    Dbs(DbsTransaction),
    Card(CardTransaction),
}

impl BankTransaction {
    pub fn format(&self) -> BankFormat {
        match self {
            BankTransaction::Dbs(_) => BankFormat::Dbs,
            BankTransaction::Card(_) => BankFormat::Card,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            BankTransaction::Dbs(tx) => tx.date,
            BankTransaction::Card(tx) => tx.date,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            BankTransaction::Dbs(tx) => &tx.description,
            BankTransaction::Card(tx) => &tx.description,
        }
    }

    /// The amount used as the matching key
    ///
    /// For DBS lines the non-zero debit wins over the credit column. Card
    /// amounts are returned without their sign.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::MissingAmount` when a DBS line has neither a
    /// debit nor a credit amount. Such a line can only come from a parsing
    /// defect, so it is not reported as a discrepancy.
    pub fn amount(&self) -> Result<Amount, ReconcileError> {
        match self {
            BankTransaction::Dbs(tx) => tx
                .debit_amount
                .filter(|amount| !amount.is_zero())
                .or(tx.credit_amount)
                .or(tx.debit_amount)
                .ok_or_else(|| ReconcileError::missing_amount(&self.record_label())),
            BankTransaction::Card(tx) => Ok(tx.amount.abs()),
        }
    }

    /// Whether money left the account (an expense the ledger should know about)
    pub fn is_debit(&self) -> bool {
        match self {
            BankTransaction::Dbs(tx) => tx.debit_amount.is_some_and(|amount| !amount.is_zero()),
            BankTransaction::Card(tx) => !tx.amount.is_negative() && !tx.amount.is_zero(),
        }
    }

    /// Short human-readable reference used in error messages
    pub fn record_label(&self) -> String {
        format!(
            "{} statement line dated {} '{}'",
            self.format(),
            self.date(),
            self.description()
        )
    }
}

/// A raw row of the Expense Manager `expense_report` table
///
/// Columns are kept as the database stores them; nothing is validated until
/// the normalizer maps the row into a [`LedgerTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedRow {
    pub id: LedgerId,
    pub account: String,
    pub amount: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub payment_method: Option<String>,
    pub description: String,
    /// Expense time in milliseconds since the Unix epoch
    pub expensed_at: Option<i64>,
    pub reference_number: String,
}

/// Canonical ledger transaction
///
/// Created by the normalizer from a persisted row; immutable during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTransaction {
    pub id: LedgerId,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    /// Calendar date of the expense; `None` when the row carries no usable time
    pub date: Option<NaiveDate>,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub account: String,
}
