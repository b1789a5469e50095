//! Synchronous CSV reader with iterator interface
//!
//! Streams operation records from a script file one row at a time, so memory
//! use does not grow with the script length.
//!
//! ```text
//! CSV file → SyncReader → Iterator<Item = Result<OperationRecord, LedgerError>>
//!                 ↓
//!          csv_format module
//!          (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, OperationRecord};
use csv::{Reader, ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous operation script reader
///
/// Yields one item per data row. Rows that fail to parse or convert are
/// yielded as a `ParseError` carrying the line number, so the caller decides
/// whether to skip them.
pub struct SyncReader {
    reader: Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a script file for reading
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `IoError` for any other
    /// failure to open it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use account_ledger::io::sync_reader::SyncReader;
    /// use std::path::Path;
    ///
    /// let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
    /// for record in reader.flatten() {
    ///     println!("{} {}", record.op.name(), record.account);
    /// }
    /// ```
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        // Header is line 1
        self.line_num += 1;

        let line = self.line_num;
        Some(
            row.map_err(LedgerError::from)
                .and_then(convert_csv_record)
                .map_err(|e| e.at_line(line)),
        )
    }
}
