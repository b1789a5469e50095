//! Core trait for account storage
//!
//! This module defines the seam between operation dispatch and the place
//! accounts live, so the synchronous and the thread-safe store can be driven by
//! the same dispatch code.

use crate::core::account::Account;
use crate::types::{LedgerError, Receipt};
use rust_decimal::Decimal;

/// Trait for storing accounts and coordinating operations on them
///
/// Implementations can be single-threaded (`AccountRegistry`, using HashMap) or
/// thread-safe (`&SharedRegistry`, using DashMap and per-account locks).
pub trait AccountStore {
    /// Create and insert a new account
    ///
    /// Fails with `DuplicateAccount` if the number is taken, or with the
    /// account's own construction error.
    fn open(
        &mut self,
        account_number: &str,
        owner_name: &str,
        initial_balance: Decimal,
    ) -> Result<Receipt, LedgerError>;

    /// Run `f` with exclusive access to one account
    fn with_account<R, F>(&mut self, account_number: &str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<R, LedgerError>;

    /// Transfer funds between two distinct accounts
    ///
    /// Both ledger appends must become visible together.
    fn transfer(&mut self, from: &str, to: &str, amount: Decimal)
        -> Result<Receipt, LedgerError>;

    /// Snapshot of every account, sorted by account number
    fn accounts(&self) -> Vec<Account>;
}
