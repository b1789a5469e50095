//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: lifecycle state, loans and operation receipts
//! - `transaction`: ledger entries and operation records
//! - `error`: error type for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{AccountStatus, Loan, Receipt};
pub use error::LedgerError;
pub use transaction::{AccountNumber, EntryKind, LedgerEntry, OperationRecord, OperationType};
