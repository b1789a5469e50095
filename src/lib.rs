//! Account Ledger Library
//!
//! # Overview
//!
//! This library models bank accounts whose balance is derived from an
//! append-only ledger, and replays CSV operation scripts against them with
//! either a sequential or a batched async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (ledger entries, loans, operation records, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account`] - The account entity and its operations
//!   - [`core::loan_book`] - Loans and oldest-first repayment allocation
//!   - [`core::engine`] - Operation dispatch over an account store
//!   - `core::async` - Thread-safe registry and lane-parallel batches
//! - [`io`] - Script reading and report writing
//! - [`strategy`] - Complete processing pipelines
//!
//! # Operations
//!
//! - **open**: Create an account with an owner and an optional initial deposit
//! - **deposit / withdraw**: Move funds in or out (withdrawals respect the minimum balance)
//! - **transfer**: Move funds between two accounts atomically
//! - **loan / repay**: Borrow funds and repay outstanding loans oldest first
//! - **interest**: Credit `balance * rate` to a positive balance
//! - **freeze / unfreeze / close**: Lifecycle changes
//! - **minimum / owner**: Account metadata
//!
//! # Account States
//!
//! - `Active`: all operations allowed
//! - `Frozen`: fund movements rejected; metadata changes still allowed
//! - `Closed`: ledger wiped, every further operation rejected

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{Account, AccountRegistry, AsyncLedgerEngine, LedgerEngine, SharedRegistry};
pub use io::{write_accounts_csv, write_statements};
pub use types::{
    AccountNumber, AccountStatus, EntryKind, LedgerEntry, LedgerError, Loan, OperationRecord,
    OperationType, Receipt,
};
