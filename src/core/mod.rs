//! Core business logic module
//!
//! This module contains the account model and the components that drive it:
//! - `ledger` - Append-only ledger and balance derivation
//! - `loan_book` - Loans and oldest-first repayment allocation
//! - `account` - The account entity and all of its operations
//! - `statement` - Text reports over an account
//! - `traits` - Store abstraction shared by sync and async implementations
//! - `account_registry` - Single-threaded account store
//! - `engine` - Operation dispatch
//! - `async` - Thread-safe store, engine and batch processor

pub mod account;
pub mod account_registry;
pub mod r#async;
pub mod engine;
pub mod ledger;
pub mod loan_book;
pub mod statement;
pub mod traits;

pub use account::Account;
pub use account_registry::AccountRegistry;
pub use engine::{apply_operation, LedgerEngine};
pub use ledger::Ledger;
pub use loan_book::{LoanBook, RepaymentPlan};
pub use r#async::{AsyncLedgerEngine, BatchProcessor, SharedRegistry};
pub use traits::AccountStore;
