//! Asynchronous statement reader with batch interface
//!
//! Provides a streaming interface over the transaction lines of a bank
//! statement file. Supports batch reading for the async processing strategy.
//!
//! # Design
//!
//! The AsyncStatementReader uses:
//! - futures `AsyncBufRead` to skip preamble lines up to the header
//! - csv-async for streaming CSV parsing of the remaining rows
//! - tokio-util compat to read tokio files through the futures I/O traits
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat → AsyncStatementReader → Batches of BankTransactions
//!                                    ↓
//!                            csv_format module
//!               (detect_format, DbsCsvRecord, CardCsvRecord, convert_*)
//! ```

use crate::io::csv_format::{
    convert_card_record, convert_dbs_record, detect_format, CardCsvRecord, DbsCsvRecord,
};
use crate::types::{BankFormat, BankTransaction, ReconcileError};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::io::{AsyncBufReadExt, AsyncRead, BufReader};
use std::io::ErrorKind;
use std::path::Path;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Asynchronous bank statement reader
///
/// Provides batch reading interface over statement lines.
/// Maintains streaming behavior with constant memory usage.
pub struct AsyncStatementReader<R: AsyncRead + Unpin + Send> {
    csv_reader: csv_async::AsyncReader<BufReader<R>>,
    format: BankFormat,
    header_line: u64,
    source: String,
}

impl AsyncStatementReader<Compat<tokio::fs::File>> {
    /// Open a statement file and locate its header
    ///
    /// # Errors
    ///
    /// * `ReconcileError::FileNotFound` if the path does not exist
    /// * `ReconcileError::UnrecognizedFormat` if no known header row is found
    pub async fn open(path: &Path) -> Result<Self, ReconcileError> {
        let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReconcileError::file_not_found(&path.display().to_string()),
            _ => ReconcileError::from(e),
        })?;

        Self::from_reader(file.compat(), &path.display().to_string()).await
    }
}

impl<R: AsyncRead + Unpin + Send> AsyncStatementReader<R> {
    /// Create a reader over any async byte source
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing statement bytes
    /// * `source` - Name used in log and error messages
    pub async fn from_reader(reader: R, source: &str) -> Result<Self, ReconcileError> {
        let mut buffered = BufReader::new(reader);
        let mut line = String::new();
        let mut header_line = 0;

        let format = loop {
            line.clear();
            if buffered.read_line(&mut line).await? == 0 {
                return Err(ReconcileError::unrecognized_format(source));
            }
            header_line += 1;

            if let Some(format) = detect_format(&line) {
                break format;
            }
        };

        tracing::debug!(statement = source, %format, header_line, "Detected statement format");

        let csv_reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .create_reader(buffered);

        Ok(Self {
            csv_reader,
            format,
            header_line,
            source: source.to_string(),
        })
    }

    /// Layout detected from the header row
    pub fn format(&self) -> BankFormat {
        self.format
    }

    fn convert(&self, record: &StringRecord) -> Result<BankTransaction, String> {
        match self.format {
            BankFormat::Dbs => record
                .deserialize::<DbsCsvRecord>(None)
                .map_err(|e| e.to_string())
                .and_then(convert_dbs_record),
            BankFormat::Card => record
                .deserialize::<CardCsvRecord>(None)
                .map_err(|e| e.to_string())
                .and_then(convert_card_record),
        }
    }

    /// Read a batch of statement lines
    ///
    /// Reads up to `batch_size` rows, converting them to BankTransactions.
    /// Malformed rows are logged with their file line number and skipped.
    ///
    /// # Returns
    ///
    /// A vector of successfully converted transactions. Returns an empty
    /// vector when the end of the file is reached.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::IoError` if the underlying source fails.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<BankTransaction>, ReconcileError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut record = StringRecord::new();

        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut record).await {
                Ok(false) => break,
                Ok(true) => {
                    let line = record.position().map(|pos| self.header_line + pos.line());
                    match self.convert(&record) {
                        Ok(transaction) => batch.push(transaction),
                        Err(e) => tracing::warn!(
                            statement = %self.source,
                            line,
                            error = %e,
                            "Skipping malformed statement line"
                        ),
                    }
                }
                Err(e) if matches!(e.kind(), csv_async::ErrorKind::Io(_)) => {
                    return Err(ReconcileError::IoError {
                        message: e.to_string(),
                    });
                }
                Err(e) => tracing::warn!(
                    statement = %self.source,
                    error = %e,
                    "Skipping malformed statement line"
                ),
            }
        }

        Ok(batch)
    }

    /// Read every remaining statement line
    pub async fn read_all(&mut self, batch_size: usize) -> Result<Vec<BankTransaction>, ReconcileError> {
        let mut transactions = Vec::new();

        loop {
            let batch = self.read_batch(batch_size.max(1)).await?;
            if batch.is_empty() {
                break;
            }
            transactions.extend(batch);
        }

        Ok(transactions)
    }
}
