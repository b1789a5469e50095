//! Thread-safe account registry
//!
//! This module provides the `SharedRegistry` struct, which holds accounts in a
//! `DashMap` with one mutex per account so that independent accounts can be
//! mutated from several threads at once.
//!
//! # Transfers
//!
//! A transfer needs both accounts at the same time. Both locks are taken in
//! lexicographic order of account number, whichever side is the source, so two
//! opposite transfers between the same pair can never deadlock. Both ledger
//! appends happen while both locks are held, so a concurrent reader sees either
//! neither append or both.
//!
//! DashMap shard guards are never held while an account lock is: the account's
//! `Arc` is cloned out of the map first.

use crate::core::account::Account;
use crate::core::traits::AccountStore;
use crate::types::{AccountNumber, LedgerError, Receipt};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type AccountHandle = Arc<Mutex<Account>>;

/// Concurrent account registry
#[derive(Debug, Default)]
pub struct SharedRegistry {
    accounts: DashMap<AccountNumber, AccountHandle>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Create and insert a new account
    pub fn open(
        &self,
        account_number: &str,
        owner_name: &str,
        initial_balance: Decimal,
    ) -> Result<Receipt, LedgerError> {
        if self.accounts.contains_key(account_number) {
            return Err(duplicate(account_number));
        }
        let account = Account::new(account_number, owner_name, initial_balance)?;
        let receipt = Receipt {
            message: format!("Account {} opened for {}", account_number, owner_name),
            balance: account.balance(),
            outstanding_debt: Decimal::ZERO,
        };

        // Another thread may have opened the same number since the check above
        let mut inserted = false;
        self.accounts
            .entry(account_number.to_string())
            .or_insert_with(|| {
                inserted = true;
                Arc::new(Mutex::new(account))
            });
        if !inserted {
            return Err(duplicate(account_number));
        }
        Ok(receipt)
    }

    /// Run `f` while holding the account's lock
    pub fn with_account<R, F>(&self, account_number: &str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<R, LedgerError>,
    {
        let handle = self.handle(account_number)?;
        let mut account = lock(&handle);
        f(&mut account)
    }

    /// Transfer funds under ordered locking
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<Receipt, LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer {
                account: from.to_string(),
            });
        }
        let source = self.handle(from)?;
        let target = self.handle(to)?;

        let (mut source, mut target) = if from < to {
            let source = lock(&source);
            (source, lock(&target))
        } else {
            let target = lock(&target);
            (lock(&source), target)
        };
        source.transfer_to(&mut target, amount)
    }

    /// Snapshot of one account
    pub fn get(&self, account_number: &str) -> Option<Account> {
        let handle = self.handle(account_number).ok()?;
        let account = lock(&handle).clone();
        Some(account)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshot of every account, sorted by account number
    ///
    /// Each account is copied under its own lock; the snapshot as a whole is not
    /// atomic with respect to concurrent writers.
    pub fn accounts(&self) -> Vec<Account> {
        let handles: Vec<AccountHandle> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut accounts: Vec<Account> = handles.iter().map(|h| lock(h).clone()).collect();
        accounts.sort_by(|a, b| a.account_number().cmp(b.account_number()));
        accounts
    }

    fn handle(&self, account_number: &str) -> Result<AccountHandle, LedgerError> {
        self.accounts
            .get(account_number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::unknown_account(account_number))
    }
}

impl AccountStore for &SharedRegistry {
    fn open(
        &mut self,
        account_number: &str,
        owner_name: &str,
        initial_balance: Decimal,
    ) -> Result<Receipt, LedgerError> {
        SharedRegistry::open(self, account_number, owner_name, initial_balance)
    }

    fn with_account<R, F>(&mut self, account_number: &str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<R, LedgerError>,
    {
        SharedRegistry::with_account(self, account_number, f)
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<Receipt, LedgerError> {
        SharedRegistry::transfer(self, from, to, amount)
    }

    fn accounts(&self) -> Vec<Account> {
        SharedRegistry::accounts(self)
    }
}

fn duplicate(account_number: &str) -> LedgerError {
    LedgerError::DuplicateAccount {
        account: account_number.to_string(),
    }
}

// Operations validate before mutating, so a poisoned account is still consistent
fn lock(handle: &Mutex<Account>) -> MutexGuard<'_, Account> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
