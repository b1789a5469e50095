//! Operation processing engine
//!
//! This module routes [`OperationRecord`]s to the account store. Dispatch is
//! written once, against the [`AccountStore`] trait, and shared by the
//! synchronous [`LedgerEngine`] and the thread-safe async engine.
//!
//! The engine only checks that a record carries the fields its operation needs;
//! every business rule lives on the `Account` itself.

use crate::core::account::Account;
use crate::core::account_registry::AccountRegistry;
use crate::core::traits::AccountStore;
use crate::types::{LedgerError, OperationRecord, OperationType, Receipt};
use rust_decimal::Decimal;

/// Interest rate used when an `interest` record carries no rate (5%)
pub const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Apply one operation record to a store
///
/// # Errors
///
/// Returns `MissingField` when the record lacks a required field, otherwise
/// whatever the store or the account reports.
pub fn apply_operation<S: AccountStore>(
    store: &mut S,
    record: &OperationRecord,
) -> Result<Receipt, LedgerError> {
    let account = record.account.as_str();

    match record.op {
        OperationType::Open => {
            let owner = record
                .owner
                .as_deref()
                .ok_or_else(|| missing(record, "owner"))?;
            store.open(account, owner, record.amount.unwrap_or(Decimal::ZERO))
        }
        OperationType::Deposit => {
            let amount = required_amount(record)?;
            store.with_account(account, |acc| acc.deposit(amount))
        }
        OperationType::Withdraw => {
            let amount = required_amount(record)?;
            store.with_account(account, |acc| acc.withdraw(amount))
        }
        OperationType::Transfer => {
            let target = record
                .target
                .as_deref()
                .ok_or_else(|| missing(record, "target"))?;
            let amount = required_amount(record)?;
            store.transfer(account, target, amount)
        }
        OperationType::Loan => {
            let amount = required_amount(record)?;
            store.with_account(account, |acc| acc.request_loan(amount))
        }
        OperationType::Repay => {
            let amount = required_amount(record)?;
            store.with_account(account, |acc| acc.repay_loan(amount))
        }
        OperationType::Interest => {
            let rate = record.amount.unwrap_or(DEFAULT_INTEREST_RATE);
            store.with_account(account, |acc| acc.apply_interest(rate))
        }
        OperationType::Freeze => store.with_account(account, Account::freeze),
        OperationType::Unfreeze => store.with_account(account, Account::unfreeze),
        OperationType::Minimum => {
            let amount = required_amount(record)?;
            store.with_account(account, |acc| acc.set_minimum_balance(amount))
        }
        OperationType::Owner => {
            let owner = record
                .owner
                .clone()
                .ok_or_else(|| missing(record, "owner"))?;
            store.with_account(account, |acc| acc.change_owner(owner))
        }
        OperationType::Close => store.with_account(account, Account::close),
    }
}

fn required_amount(record: &OperationRecord) -> Result<Decimal, LedgerError> {
    record.amount.ok_or_else(|| missing(record, "amount"))
}

fn missing(record: &OperationRecord, field: &str) -> LedgerError {
    LedgerError::missing_field(record.op.name(), &record.account, field)
}

/// Single-threaded operation engine
///
/// Owns an [`AccountRegistry`] and applies records to it one at a time.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    registry: AccountRegistry,
}

impl LedgerEngine {
    /// Create an engine with no accounts
    pub fn new() -> Self {
        LedgerEngine {
            registry: AccountRegistry::new(),
        }
    }

    /// Apply one record
    pub fn process(&mut self, record: &OperationRecord) -> Result<Receipt, LedgerError> {
        apply_operation(&mut self.registry, record)
    }

    /// Read access to the underlying registry
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Final account states, sorted by account number
    pub fn get_accounts(&self) -> Vec<Account> {
        self.registry.accounts()
    }
}
