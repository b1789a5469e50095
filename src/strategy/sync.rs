//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. It streams
//! records from a `SyncReader` into a `LedgerEngine` one at a time, then writes
//! the report.
//!
//! Memory use is O(accounts + ledger entries); the script itself is never held
//! in memory.

use crate::cli::ReportFormat;
use crate::core::LedgerEngine;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_outcome, write_report, ProcessingStrategy};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use account_ledger::cli::ReportFormat;
/// use account_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ReportFormat::Summary);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    report: ReportFormat,
}

impl SyncProcessingStrategy {
    pub fn new(report: ReportFormat) -> Self {
        Self { report }
    }
}

impl Default for SyncProcessingStrategy {
    fn default() -> Self {
        Self::new(ReportFormat::Summary)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let mut engine = LedgerEngine::new();
        let reader = SyncReader::new(input_path).map_err(|e| e.to_string())?;

        for result in reader {
            match result {
                Ok(record) => {
                    let outcome = engine.process(&record);
                    log_outcome(&record, &outcome);
                }
                Err(e) => tracing::warn!(error = %e, "skipping script row"),
            }
        }

        write_report(self.report, &engine.get_accounts(), output)
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

    fn run(strategy: SyncProcessingStrategy, content: &str) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_writes_summary() {
        let output = run(
            SyncProcessingStrategy::default(),
            "op,account,target,amount,owner\n\
             open,ACC-1,,900,Ada\n\
             deposit,ACC-1,,100,\n\
             withdraw,ACC-1,,300,\n",
        );

        assert_eq!(
            output,
            "account,owner,balance,debt,minimum,status\nACC-1,Ada,700.00,0.00,0.00,Active\n"
        );
    }

    #[test]
    fn test_sync_strategy_skips_bad_rows_and_rejections() {
        let output = run(
            SyncProcessingStrategy::default(),
            "op,account,target,amount,owner\n\
             open,ACC-1,,10,Ada\n\
             explode,ACC-1,,10,\n\
             withdraw,ACC-1,,50,\n\
             deposit,ACC-1,,5,\n",
        );

        assert!(output.contains("ACC-1,Ada,15.00,0.00,0.00,Active"));
    }

    #[test]
    fn test_sync_strategy_writes_statements() {
        let output = run(
            SyncProcessingStrategy::new(ReportFormat::Statements),
            "op,account,target,amount,owner\nopen,ACC-1,,50,Ada\n",
        );

        assert!(output.starts_with("___ Account Statement for Account ACC-1 ___\n"));
        assert!(output.contains("Current Balance: $50.00"));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();
        let result = SyncProcessingStrategy::default().process(Path::new("nonexistent.csv"), &mut output);
        assert_eq!(result.unwrap_err(), "File not found: nonexistent.csv");
        assert!(output.is_empty());
    }
}
