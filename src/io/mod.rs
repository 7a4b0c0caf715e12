//! I/O module
//!
//! Handles statement parsing, ledger database access and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (layout detection, record conversion, report serialization)
//! - `sync_reader` - Synchronous statement reader with iterator interface
//! - `async_reader` - Asynchronous statement reader with batch reading interface
//! - `ledger_db` - Read-only access to the Expense Manager SQLite database

pub mod async_reader;
pub mod csv_format;
pub mod ledger_db;
pub mod sync_reader;

pub use async_reader::AsyncStatementReader;
pub use csv_format::{
    convert_card_record, convert_dbs_record, detect_format, write_discrepancies_csv,
    write_residue_csv, CardCsvRecord, DbsCsvRecord,
};
pub use ledger_db::{LedgerDatabase, LedgerSource};
pub use sync_reader::StatementReader;
