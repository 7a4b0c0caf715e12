//! CSV format handling for bank statements and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Statement layout detection from the header row
//! - Positional record structures for each supported statement layout
//! - Conversion from CSV records to [`BankTransaction`] values
//! - Discrepancy and residue report serialization
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Statement Layouts
//!
//! DBS account exports:
//!
//! ```text
//! Transaction Date,Reference,Debit Amount,Credit Amount,Transaction Ref1,Transaction Ref2,Transaction Ref3
//! 15 Mar 2024,MST,4.50,,COFFEE BEAN,SINGAPORE SG,
//! ```
//!
//! Credit card exports:
//!
//! ```text
//! Date,Description,Amount
//! 2024-03-15,NETFLIX.COM,15.98
//! ```

use crate::strategy::StatementReport;
use crate::types::{Amount, BankFormat, BankTransaction, CardTransaction, DbsTransaction};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Write;

/// Leading header columns of a DBS account export
pub const DBS_HEADER: [&str; 4] = [
    "Transaction Date",
    "Reference",
    "Debit Amount",
    "Credit Amount",
];

/// Header columns of a credit card export
pub const CARD_HEADER: [&str; 3] = ["Date", "Description", "Amount"];

/// Date layout of DBS exports, e.g. `15 Mar 2024`
pub const DBS_DATE_FORMAT: &str = "%d %b %Y";

/// Date layout of card exports, e.g. `2024-03-15`
pub const CARD_DATE_FORMAT: &str = "%Y-%m-%d";

/// One data row of a DBS export, read by position
///
/// The trailing reference columns are optional because some exports omit
/// empty trailing fields.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DbsCsvRecord {
    pub transaction_date: String,
    pub reference: String,
    #[serde(default)]
    pub debit_amount: String,
    #[serde(default)]
    pub credit_amount: String,
    #[serde(default)]
    pub transaction_ref1: String,
    #[serde(default)]
    pub transaction_ref2: String,
    #[serde(default)]
    pub transaction_ref3: String,
}

/// One data row of a credit card export, read by position
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CardCsvRecord {
    pub date: String,
    pub description: String,
    pub amount: String,
}

/// Identify the statement layout from a header line
///
/// Column names are compared case-insensitively, ignoring surrounding
/// whitespace and quotes. Returns `None` for preamble lines and unknown files.
pub fn detect_format(line: &str) -> Option<BankFormat> {
    let columns: Vec<String> = line
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|column| column.trim().trim_matches('"').trim().to_lowercase())
        .collect();

    let starts_with = |expected: &[&str]| {
        columns.len() >= expected.len()
            && expected
                .iter()
                .zip(&columns)
                .all(|(expected, actual)| expected.to_lowercase() == *actual)
    };

    if starts_with(&DBS_HEADER) {
        Some(BankFormat::Dbs)
    } else if starts_with(&CARD_HEADER) {
        Some(BankFormat::Card)
    } else {
        None
    }
}

fn parse_date(raw: &str, format: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), format)
        .map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

fn parse_optional_amount(raw: &str) -> Result<Option<Amount>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<Amount>()
        .map(Some)
        .map_err(|_| format!("Invalid amount '{}'", raw))
}

/// Convert a DBS CSV record to a BankTransaction
///
/// This function:
/// - Parses the transaction date (`15 Mar 2024`)
/// - Parses the debit and credit columns, either of which may be blank
/// - Joins the non-empty reference columns into the description
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(BankTransaction) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_dbs_record(record: DbsCsvRecord) -> Result<BankTransaction, String> {
    let date = parse_date(&record.transaction_date, DBS_DATE_FORMAT)?;
    let debit_amount = parse_optional_amount(&record.debit_amount)?;
    let credit_amount = parse_optional_amount(&record.credit_amount)?;

    if debit_amount.is_none() && credit_amount.is_none() {
        return Err(format!(
            "Statement line dated {} has neither a debit nor a credit amount",
            record.transaction_date
        ));
    }

    let description = [
        &record.transaction_ref1,
        &record.transaction_ref2,
        &record.transaction_ref3,
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    Ok(BankTransaction::Dbs(DbsTransaction {
        date,
        reference: record.reference.trim().to_string(),
        debit_amount,
        credit_amount,
        description,
    }))
}

/// Convert a card CSV record to a BankTransaction
///
/// # Returns
///
/// Result containing either:
/// - Ok(BankTransaction) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_card_record(record: CardCsvRecord) -> Result<BankTransaction, String> {
    let date = parse_date(&record.date, CARD_DATE_FORMAT)?;
    let amount = parse_optional_amount(&record.amount)?
        .ok_or_else(|| format!("Statement line dated {} has no amount", record.date))?;

    Ok(BankTransaction::Card(CardTransaction {
        date,
        description: record.description.trim().to_string(),
        amount,
    }))
}

/// Write discrepant bank transactions to CSV format
///
/// Writes one row per discrepancy with columns:
/// statement, date, description, amount, payment_method, reason.
/// Statements keep their run order and discrepancies keep bank input order.
///
/// # Arguments
///
/// * `reports` - Per-statement reconciliation results
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_discrepancies_csv(
    reports: &[StatementReport],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "statement",
            "date",
            "description",
            "amount",
            "payment_method",
            "reason",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for statement in reports {
        let source = statement.statement.display().to_string();

        for discrepancy in &statement.report.discrepancies {
            let transaction = &discrepancy.transaction;
            let amount = transaction
                .amount()
                .map(|amount| amount.to_string())
                .unwrap_or_default();
            let payment_method = discrepancy
                .payment_method
                .map(|method| method.label().to_string())
                .unwrap_or_default();

            writer
                .write_record([
                    source.clone(),
                    transaction.date().to_string(),
                    transaction.description().to_string(),
                    amount,
                    payment_method,
                    discrepancy.reason.code().to_string(),
                ])
                .map_err(|e| format!("Failed to write discrepancy record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write unconsumed ledger transactions to CSV format
///
/// Writes one row per residue entry with columns:
/// statement, id, date, description, amount, payment_method, category.
/// Each statement run reports its own residue against the full ledger.
pub fn write_residue_csv(reports: &[StatementReport], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "statement",
            "id",
            "date",
            "description",
            "amount",
            "payment_method",
            "category",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for statement in reports {
        let source = statement.statement.display().to_string();

        for ledger in &statement.report.residue {
            writer
                .write_record([
                    source.clone(),
                    ledger.id.to_string(),
                    ledger.date.map(|date| date.to_string()).unwrap_or_default(),
                    ledger.description.clone(),
                    ledger.amount.to_string(),
                    ledger.payment_method.label().to_string(),
                    ledger.category.clone(),
                ])
                .map_err(|e| format!("Failed to write residue record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
