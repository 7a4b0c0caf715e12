//! Expense Manager ledger database access
//!
//! Reads the `expense_report` table of an Expense Manager SQLite export into
//! raw [`PersistedRow`] values. Nothing is validated here; the normalizer
//! decides what a usable row is.
//!
//! # Table Layout
//!
//! ```text
//! expense_report(
//!     _id INTEGER PRIMARY KEY,
//!     account TEXT,
//!     amount TEXT,            -- decimal string; REAL and INTEGER are accepted
//!     category TEXT,
//!     subcategory TEXT,
//!     payment_method TEXT,
//!     description TEXT,
//!     expensed_time INTEGER,  -- milliseconds since the Unix epoch
//!     referenceNumber TEXT
//! )
//! ```

use crate::types::{PersistedRow, ReconcileError};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;

const SELECT_ROWS: &str = "SELECT _id, account, amount, category, subcategory, payment_method, \
     description, expensed_time, referenceNumber \
     FROM expense_report ORDER BY _id";

/// A source of raw ledger rows
pub trait LedgerSource {
    /// Read every ledger row, ordered by row id
    fn read_rows(&self) -> Result<Vec<PersistedRow>, ReconcileError>;
}

impl LedgerSource for Vec<PersistedRow> {
    fn read_rows(&self) -> Result<Vec<PersistedRow>, ReconcileError> {
        Ok(self.clone())
    }
}

/// Read-only handle on an Expense Manager database file
#[derive(Debug)]
pub struct LedgerDatabase {
    connection: Connection,
}

impl LedgerDatabase {
    /// Open the database file in read-only mode
    ///
    /// # Errors
    ///
    /// * `ReconcileError::FileNotFound` if the path does not exist
    /// * `ReconcileError::DatabaseError` if SQLite cannot open the file
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        if !path.exists() {
            return Err(ReconcileError::file_not_found(&path.display().to_string()));
        }

        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        tracing::debug!(path = %path.display(), "Opened ledger database");

        Ok(Self { connection })
    }

    /// Wrap an existing connection
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }
}

impl LedgerSource for LedgerDatabase {
    fn read_rows(&self) -> Result<Vec<PersistedRow>, ReconcileError> {
        let mut stmt = self.connection.prepare(SELECT_ROWS)?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(rows = rows.len(), "Read ledger rows");
        Ok(rows)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<PersistedRow> {
    Ok(PersistedRow {
        id: row.get(0)?,
        account: text_or_default(row, 1)?,
        amount: loose_text(row, 2)?,
        category: text_or_default(row, 3)?,
        subcategory: text_or_default(row, 4)?,
        payment_method: loose_text(row, 5)?,
        description: text_or_default(row, 6)?,
        expensed_at: row.get(7)?,
        reference_number: text_or_default(row, 8)?,
    })
}

fn text_or_default(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(loose_text(row, index)?.unwrap_or_default())
}

/// Read a column as text whatever its storage class
fn loose_text(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<String>> {
    let value = match row.get_ref(index)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const SCHEMA: &str = "CREATE TABLE expense_report (
        _id INTEGER PRIMARY KEY,
        account TEXT,
        amount TEXT,
        category TEXT,
        subcategory TEXT,
        payment_method TEXT,
        description TEXT,
        expensed_time INTEGER,
        referenceNumber TEXT
    );";

    fn create_ledger_db(inserts: &str) -> NamedTempFile {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        let conn = Connection::open(file.path()).expect("Failed to open database");
        conn.execute_batch(SCHEMA).expect("Failed to create schema");
        conn.execute_batch(inserts).expect("Failed to insert rows");
        file
    }

    #[test]
    fn test_read_rows_ordered_by_id() {
        let file = create_ledger_db(
            "INSERT INTO expense_report VALUES (3, 'Personal', '12.50', 'Food', 'Dinner', 'Credit Card', 'Dinner', 1710475200000, '');
             INSERT INTO expense_report VALUES (1, 'Personal', '4.50', 'Food', 'Coffee', 'Debit Card', 'Coffee', 1710475200000, 'R1');",
        );

        let rows = LedgerDatabase::open(file.path())
            .unwrap()
            .read_rows()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].amount.as_deref(), Some("4.50"));
        assert_eq!(rows[0].payment_method.as_deref(), Some("Debit Card"));
        assert_eq!(rows[0].reference_number, "R1");
        assert_eq!(rows[0].expensed_at, Some(1_710_475_200_000));
        assert_eq!(rows[1].id, 3);
        assert_eq!(rows[1].subcategory, "Dinner");
    }

    #[test]
    fn test_read_rows_keeps_nulls_and_numeric_amounts() {
        let file = create_ledger_db(
            "INSERT INTO expense_report VALUES (1, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL);
             INSERT INTO expense_report VALUES (2, 'Personal', 7, 'Misc', '', 'Cash', '', 0, '');",
        );

        let rows = LedgerDatabase::open(file.path())
            .unwrap()
            .read_rows()
            .unwrap();

        assert_eq!(
            rows[0],
            PersistedRow {
                id: 1,
                ..PersistedRow::default()
            }
        );
        assert_eq!(rows[1].amount.as_deref(), Some("7"));
    }

    #[test]
    fn test_open_missing_file() {
        let result = LedgerDatabase::open(Path::new("does-not-exist.db"));
        assert!(matches!(
            result.unwrap_err(),
            ReconcileError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_read_rows_from_open_connection() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(
            "INSERT INTO expense_report VALUES (1, 'Personal', 12.5, 'Food', '', 'Credit Card', 'Dinner', NULL, '');",
        )
        .unwrap();

        let rows = LedgerDatabase::from_connection(conn).read_rows().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount.as_deref(), Some("12.5"));
        assert_eq!(rows[0].expensed_at, None);
    }

    #[test]
    fn test_missing_table_is_database_error() {
        let conn = Connection::open_in_memory().unwrap();

        let result = LedgerDatabase::from_connection(conn).read_rows();
        assert!(matches!(
            result.unwrap_err(),
            ReconcileError::DatabaseError { .. }
        ));
    }

    #[test]
    fn test_vec_source_returns_rows() {
        let rows = vec![PersistedRow {
            id: 9,
            ..PersistedRow::default()
        }];

        assert_eq!(rows.read_rows().unwrap(), rows);
    }
}
