//! Asynchronous CSV reader with batch interface
//!
//! Streams operation records with csv-async and hands them out in batches for
//! the async processing strategy.
//!
//! ```text
//! CSV reader → AsyncReader → Batches of OperationRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, OperationRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous operation script reader
///
/// Keeps memory bounded by the batch size rather than the script length.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` operation records
    ///
    /// Rows that fail to parse or convert are logged and skipped; they do not
    /// count toward the batch size. An empty vector means the end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;

            match row.map_err(LedgerError::from).and_then(convert_csv_record) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    let error = e.at_line(self.line_num);
                    tracing::warn!(error = %error, "skipping script row");
                }
            }
        }

        batch
    }
}
