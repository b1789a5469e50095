//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of the ProcessingStrategy trait. Records are
//! read in batches and each batch is split into account-connected lanes that
//! run in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (lane partitioning + tokio tasks)
//!     └── AsyncLedgerEngine (thread-safe processing)
//!         └── SharedRegistry (DashMap of per-account locks)
//! ```
//!
//! Batches are processed one after another, so an account whose records span
//! several batches still sees them in script order.

use crate::cli::ReportFormat;
use crate::core::r#async::{AsyncLedgerEngine, BatchProcessor, SharedRegistry};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{log_outcome, write_report, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid worker count, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Produces the same final account states as [`SyncProcessingStrategy`] for
/// any script.
///
/// [`SyncProcessingStrategy`]: crate::strategy::SyncProcessingStrategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    report: ReportFormat,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, report: ReportFormat) -> Self {
        Self { config, report }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::from(e).to_string())?;

        let accounts = runtime.block_on(async {
            let registry = Arc::new(SharedRegistry::new());
            let engine = Arc::new(AsyncLedgerEngine::new(Arc::clone(&registry)));
            let processor = BatchProcessor::new(engine);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| LedgerError::open_failed(input_path, e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Finish this batch before reading the next one
                for outcome in processor.process_batch(batch).await {
                    log_outcome(&outcome.record, &outcome.result);
                }
            }

            Ok::<_, LedgerError>(registry.accounts())
        })
        .map_err(|e| e.to_string())?;

        write_report(self.report, &accounts, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(config: BatchConfig, content: &str) -> String {
        let file = create_temp_csv(content);
        let strategy = AsyncProcessingStrategy::new(config, ReportFormat::Summary);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());

        let config = BatchConfig::new(5, 2);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_concurrent_batches, 2);
    }

    #[test]
    fn test_async_strategy_processes_script() {
        let output = run(
            BatchConfig::default(),
            "op,account,target,amount,owner\n\
             open,A,,700,Ada\n\
             open,B,,100,Bob\n\
             transfer,A,B,250,\n",
        );

        assert_eq!(
            output,
            "account,owner,balance,debt,minimum,status\n\
             A,Ada,450.00,0.00,0.00,Active\n\
             B,Bob,350.00,0.00,0.00,Active\n"
        );
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default(), ReportFormat::Summary);
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert_eq!(result.unwrap_err(), "File not found: nonexistent.csv");
        assert!(output.is_empty());
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // Batch size 2 splits every account's history across batches
        let output = run(
            BatchConfig::new(2, 4),
            "op,account,target,amount,owner\n\
             open,A,,100,Ada\n\
             open,B,,50,Bob\n\
             withdraw,A,,30,\n\
             deposit,B,,25,\n\
             loan,A,,40,\n\
             repay,A,,15,\n\
             withdraw,A,,20,\n",
        );

        assert!(output.contains("A,Ada,75.00,25.00,0.00,Active"), "got: {}", output);
        assert!(output.contains("B,Bob,75.00,0.00,0.00,Active"), "got: {}", output);
    }
}
