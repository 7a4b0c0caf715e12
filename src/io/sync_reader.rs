//! Synchronous statement reader with iterator interface
//!
//! Provides a streaming iterator over the transaction lines of a bank
//! statement file. Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! Bank exports often start with account metadata lines before the real
//! header. The reader consumes lines until [`detect_format`] recognizes a
//! header, then hands the rest of the buffered file to `csv::Reader` with
//! headers disabled and deserializes each row by position.
//!
//! # Iterator Interface
//!
//! StatementReader implements the Iterator trait, yielding
//! `Result<BankTransaction, ReconcileError>` for each CSV row:
//!
//! ```no_run
//! use expense_tally::io::sync_reader::StatementReader;
//! use std::path::Path;
//!
//! let reader = StatementReader::open(Path::new("statement.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(transaction) => println!("Read {:?}", transaction),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unknown layout) are returned from `open()`
//! - Malformed rows are yielded as `ReconcileError::ParseError` with the file
//!   line number; iteration continues with the next row
//! - Read failures are yielded as `ReconcileError::IoError`

use crate::io::csv_format::{
    convert_card_record, convert_dbs_record, detect_format, CardCsvRecord, DbsCsvRecord,
};
use crate::types::{BankFormat, BankTransaction, ReconcileError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

/// Synchronous bank statement reader
///
/// Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct StatementReader<R: Read = File> {
    reader: csv::Reader<BufReader<R>>,
    format: BankFormat,
    /// Lines consumed up to and including the header
    header_line: u64,
    record: StringRecord,
}

impl StatementReader<File> {
    /// Open a statement file and locate its header
    ///
    /// # Errors
    ///
    /// * `ReconcileError::FileNotFound` if the path does not exist
    /// * `ReconcileError::UnrecognizedFormat` if no known header row is found
    /// * `ReconcileError::IoError` for any other read failure
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReconcileError::file_not_found(&path.display().to_string()),
            _ => ReconcileError::from(e),
        })?;

        Self::from_reader(file, &path.display().to_string())
    }
}

impl<R: Read> StatementReader<R> {
    /// Create a reader over any byte source
    ///
    /// # Arguments
    ///
    /// * `source` - Raw statement bytes
    /// * `name` - Name used in error messages when no header is found
    pub fn from_reader(source: R, name: &str) -> Result<Self, ReconcileError> {
        let mut buffered = BufReader::with_capacity(8 * 1024, source);
        let mut line = String::new();
        let mut header_line = 0;

        let format = loop {
            line.clear();
            if buffered.read_line(&mut line)? == 0 {
                return Err(ReconcileError::unrecognized_format(name));
            }
            header_line += 1;

            if let Some(format) = detect_format(&line) {
                break format;
            }
            tracing::trace!(line = header_line, "Skipping statement preamble");
        };

        tracing::debug!(statement = name, %format, header_line, "Detected statement format");

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(buffered);

        Ok(Self {
            reader,
            format,
            header_line,
            record: StringRecord::new(),
        })
    }

    /// Layout detected from the header row
    pub fn format(&self) -> BankFormat {
        self.format
    }

    fn convert_current(&self) -> Result<BankTransaction, String> {
        match self.format {
            BankFormat::Dbs => self
                .record
                .deserialize::<DbsCsvRecord>(None)
                .map_err(|e| e.to_string())
                .and_then(convert_dbs_record),
            BankFormat::Card => self
                .record
                .deserialize::<CardCsvRecord>(None)
                .map_err(|e| e.to_string())
                .and_then(convert_card_record),
        }
    }
}

impl<R: Read> Iterator for StatementReader<R> {
    type Item = Result<BankTransaction, ReconcileError>;

    /// Get the next transaction line from the statement
    ///
    /// # Returns
    ///
    /// * `Some(Ok(BankTransaction))` - Successfully parsed line
    /// * `Some(Err(ReconcileError))` - Parse, conversion or read error
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map(|pos| self.header_line + pos.line());

                Some(
                    self.convert_current()
                        .map_err(|e| ReconcileError::parse_error(line, &e)),
                )
            }
            Err(e) if e.is_io_error() => Some(Err(ReconcileError::IoError {
                message: e.to_string(),
            })),
            Err(e) => {
                let line = e.position().map(|pos| self.header_line + pos.line());
                Some(Err(ReconcileError::parse_error(line, &e.to_string())))
            }
        }
    }
}
