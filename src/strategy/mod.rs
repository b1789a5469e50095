//! Processing strategy module for operation scripts
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! encompassing script parsing, operation processing and report output. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime.

use crate::cli::{ReportFormat, StrategyType};
use crate::core::Account;
use crate::io::csv_format::{write_accounts_csv, write_statements};
use crate::types::{LedgerError, OperationRecord, Receipt};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
///
/// Each strategy reads operation records from a script file, applies them to
/// its engine, and writes a report of the final account states.
pub trait ProcessingStrategy: Send + Sync {
    /// Process the script at `input_path` and write the report to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be started
    /// - The report cannot be written
    ///
    /// Malformed rows and rejected operations are logged and skipped; they do
    /// not make this method fail.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    report: ReportFormat,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(report)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, report))
        }
    }
}

/// Write final account states in the requested format
pub fn write_report(
    report: ReportFormat,
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), String> {
    match report {
        ReportFormat::Summary => write_accounts_csv(accounts, output),
        ReportFormat::Statements => write_statements(accounts, output),
    }
}

pub(crate) fn log_outcome(record: &OperationRecord, result: &Result<Receipt, LedgerError>) {
    match result {
        Ok(receipt) => tracing::debug!(
            op = record.op.name(),
            account = %record.account,
            balance = %receipt.balance,
            "{}",
            receipt.message
        ),
        Err(e) if !e.is_recoverable() => tracing::error!(
            op = record.op.name(),
            account = %record.account,
            error = %e,
            "operation failed"
        ),
        Err(e) => tracing::warn!(
            op = record.op.name(),
            account = %record.account,
            error = %e,
            "operation rejected"
        ),
    }
}
