//! Error types for the account ledger
//!
//! This module defines every error that can occur while constructing accounts,
//! applying operations to them, or replaying an operation script.
//!
//! # Error Categories
//!
//! - **Construction Errors**: malformed account number, owner or initial balance.
//!   These abort account creation entirely.
//! - **Operation Errors**: frozen/closed accounts, invalid amounts or rates,
//!   insufficient funds, missing loans. These are expected business outcomes; the
//!   account is left untouched when one is returned.
//! - **Store Errors**: unknown or duplicate account numbers, self transfers.
//! - **Script Errors**: file I/O, CSV parsing, unknown operations, missing fields.

use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;

/// Main error type for the account ledger
///
/// Each variant carries enough context to produce a user-facing message
/// without access to the account that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Script file not found at the specified path
    ///
    /// Fatal: replay cannot start.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown operation name in a script row
    #[error("Invalid operation '{op}'")]
    InvalidOperation {
        /// The operation string as read
        op: String,
    },

    /// A script row lacks a field its operation requires
    #[error("{op} operation on account '{account}' requires a {field}")]
    MissingField {
        /// Operation name
        op: String,
        /// Account the row refers to
        account: String,
        /// Name of the missing column
        field: String,
    },

    /// Account number is empty
    #[error("Account number must be a non-empty string")]
    InvalidAccountNumber,

    /// Owner name is empty, at construction or on owner change
    #[error("Owner name must be a non-empty string")]
    InvalidOwnerName,

    /// Initial balance is negative
    #[error("Initial balance must be a non-negative number, got {amount}")]
    InvalidInitialBalance {
        /// The rejected initial balance
        amount: Decimal,
    },

    /// Account is frozen and cannot move funds
    #[error("Account {account} is frozen")]
    AccountFrozen {
        /// Account number
        account: String,
    },

    /// Account has been closed and accepts no further operations
    #[error("Account {account} is closed")]
    AccountClosed {
        /// Account number
        account: String,
    },

    /// Freeze requested on an already frozen account
    #[error("Account {account} is already frozen")]
    AlreadyFrozen {
        /// Account number
        account: String,
    },

    /// Unfreeze requested on an active account
    #[error("Account {account} is not frozen")]
    NotFrozen {
        /// Account number
        account: String,
    },

    /// Amount is not strictly positive (or negative, for thresholds)
    #[error("Invalid amount {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Interest rate outside of [0, 1]
    #[error("Interest rate must be between 0 and 1, got {rate}")]
    InvalidRate {
        /// The rejected rate
        rate: Decimal,
    },

    /// Outflow would take the balance below the minimum, or exceeds it outright
    #[error(
        "Insufficient funds in account {account}: balance {balance}, requested {requested}, minimum balance {minimum}"
    )]
    InsufficientFunds {
        /// Account number
        account: String,
        /// Balance at the time of the request
        balance: Decimal,
        /// Requested outflow
        requested: Decimal,
        /// Minimum balance in force
        minimum: Decimal,
    },

    /// Repayment requested with no outstanding loan
    #[error("No active loan to repay on account {account}")]
    NoActiveLoan {
        /// Account number
        account: String,
    },

    /// Interest requested on a zero or negative balance
    #[error("No positive balance to apply interest on account {account}: balance {balance}")]
    NoPositiveBalance {
        /// Account number
        account: String,
        /// Current balance
        balance: Decimal,
    },

    /// Transfer target is frozen or closed
    #[error("Target account {account} is frozen")]
    TargetFrozen {
        /// Target account number
        account: String,
    },

    /// Account number not present in the store
    #[error("Account {account} not found")]
    UnknownAccount {
        /// Account number
        account: String,
    },

    /// Account number already present in the store
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// Account number
        account: String,
    },

    /// Transfer source and target are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SelfTransfer {
        /// Account number
        account: String,
    },

    /// A balance or debt would leave the representable decimal range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number
        account: String,
    },

    /// A processing task stopped before reporting its results
    ///
    /// Fatal for the records it carried: which of them were applied is unknown.
    #[error("Processing task failed: {message}")]
    TaskFailed {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AccountFrozen error
    pub fn account_frozen(account: &str) -> Self {
        LedgerError::AccountFrozen {
            account: account.to_string(),
        }
    }

    /// Create an AccountClosed error
    pub fn account_closed(account: &str) -> Self {
        LedgerError::AccountClosed {
            account: account.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        account: &str,
        balance: Decimal,
        requested: Decimal,
        minimum: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
            minimum,
        }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: &str) -> Self {
        LedgerError::UnknownAccount {
            account: account.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(op: &str, account: &str, field: &str) -> Self {
        LedgerError::MissingField {
            op: op.to_string(),
            account: account.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Report a row failure as a `ParseError` at `line`
    ///
    /// A `ParseError` keeps its message and gains the line if it had none;
    /// any other error becomes the message.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError { line: found, message } => LedgerError::ParseError {
                line: found.or(Some(line)),
                message,
            },
            other => LedgerError::ParseError {
                line: Some(line),
                message: other.to_string(),
            },
        }
    }

    /// Map a failure to open `path` to `FileNotFound` or `IoError`
    pub fn open_failed(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }

    /// Whether this error is a per-row outcome rather than a fatal failure
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            LedgerError::FileNotFound { .. }
                | LedgerError::IoError { .. }
                | LedgerError::TaskFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "ops.csv".to_string() },
        "File not found: ops.csv"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(7), message: "bad field".to_string() },
        "CSV parse error at line 7: bad field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "bad field".to_string() },
        "CSV parse error: bad field"
    )]
    #[case::missing_field(
        LedgerError::missing_field("transfer", "ACC-1", "target"),
        "transfer operation on account 'ACC-1' requires a target"
    )]
    #[case::account_frozen(
        LedgerError::account_frozen("ACC-1"),
        "Account ACC-1 is frozen"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("ACC-1", Decimal::new(5000, 2), Decimal::new(8000, 2), Decimal::new(1000, 2)),
        "Insufficient funds in account ACC-1: balance 50.00, requested 80.00, minimum balance 10.00"
    )]
    #[case::invalid_rate(
        LedgerError::InvalidRate { rate: Decimal::new(15, 1) },
        "Interest rate must be between 0 and 1, got 1.5"
    )]
    #[case::self_transfer(
        LedgerError::SelfTransfer { account: "ACC-1".to_string() },
        "Cannot transfer from account ACC-1 to itself"
    )]
    #[case::arithmetic_overflow(
        LedgerError::arithmetic_overflow("deposit", "ACC-1"),
        "Arithmetic overflow in deposit for account ACC-1"
    )]
    #[case::task_failed(
        LedgerError::TaskFailed { message: "panicked".to_string() },
        "Processing task failed: panicked"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert!(!error.is_recoverable());
    }

    #[rstest]
    #[case::not_found(std::io::ErrorKind::NotFound, true)]
    #[case::denied(std::io::ErrorKind::PermissionDenied, false)]
    fn test_open_failed_classification(#[case] kind: std::io::ErrorKind, #[case] not_found: bool) {
        let error = LedgerError::open_failed(Path::new("ops.csv"), std::io::Error::new(kind, "nope"));

        assert_eq!(matches!(error, LedgerError::FileNotFound { .. }), not_found);
        assert_eq!(matches!(error, LedgerError::IoError { .. }), !not_found);
        assert!(error.to_string().contains("ops.csv"));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_csv_error_conversion_keeps_line() {
        let data = "op,account\ndeposit,A\ndeposit,A,extra\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let error = reader
            .records()
            .find_map(Result::err)
            .expect("row with an extra field should fail");

        let error: LedgerError = error.into();
        assert!(matches!(error, LedgerError::ParseError { line: Some(_), .. }));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_at_line_wraps_row_errors() {
        let error = LedgerError::InvalidOperation { op: "bogus".to_string() }.at_line(3);
        assert_eq!(error.to_string(), "CSV parse error at line 3: Invalid operation 'bogus'");
        assert!(error.is_recoverable());

        let error = LedgerError::ParseError { line: None, message: "bad".to_string() }.at_line(4);
        assert_eq!(error.to_string(), "CSV parse error at line 4: bad");

        let error = LedgerError::ParseError { line: Some(9), message: "bad".to_string() }.at_line(4);
        assert!(matches!(error, LedgerError::ParseError { line: Some(9), .. }));
    }

    #[test]
    fn test_business_errors_are_recoverable() {
        assert!(LedgerError::account_frozen("ACC-1").is_recoverable());
        assert!(LedgerError::invalid_amount(Decimal::ZERO).is_recoverable());
    }
}
