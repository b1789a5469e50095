//! Single-threaded account registry
//!
//! This module provides the `AccountRegistry` struct which owns every account of
//! a replay session in an in-memory map keyed by account number.
//!
//! The registry is responsible for:
//! - Rejecting duplicate account numbers on open
//! - Resolving account numbers for operations
//! - Coordinating transfers between two accounts it owns
//! - Providing sorted account listings for output

use crate::core::account::Account;
use crate::core::traits::AccountStore;
use crate::types::{AccountNumber, LedgerError, Receipt};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Owns all accounts of a session
#[derive(Debug, Default)]
pub struct AccountRegistry {
    /// Map of account numbers to accounts
    accounts: HashMap<AccountNumber, Account>,
}

impl AccountRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        AccountRegistry {
            accounts: HashMap::new(),
        }
    }

    /// Look up an account
    pub fn get(&self, account_number: &str) -> Option<&Account> {
        self.accounts.get(account_number)
    }

    /// Number of accounts held
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account has been opened
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts sorted by account number
    pub fn sorted(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.account_number().cmp(b.account_number()));
        accounts
    }
}

impl AccountStore for AccountRegistry {
    fn open(
        &mut self,
        account_number: &str,
        owner_name: &str,
        initial_balance: Decimal,
    ) -> Result<Receipt, LedgerError> {
        if self.accounts.contains_key(account_number) {
            return Err(LedgerError::DuplicateAccount {
                account: account_number.to_string(),
            });
        }

        let account = Account::new(account_number, owner_name, initial_balance)?;
        let receipt = Receipt {
            message: format!("Account {} opened for {}", account_number, owner_name),
            balance: account.balance(),
            outstanding_debt: Decimal::ZERO,
        };
        self.accounts.insert(account_number.to_string(), account);
        Ok(receipt)
    }

    fn with_account<R, F>(&mut self, account_number: &str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<R, LedgerError>,
    {
        let account = self
            .accounts
            .get_mut(account_number)
            .ok_or_else(|| LedgerError::unknown_account(account_number))?;
        f(account)
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<Receipt, LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer {
                account: from.to_string(),
            });
        }
        if !self.accounts.contains_key(to) {
            return Err(LedgerError::unknown_account(to));
        }

        // Take the source out so the target can be borrowed mutably alongside it
        let mut source = self
            .accounts
            .remove(from)
            .ok_or_else(|| LedgerError::unknown_account(from))?;
        let result = match self.accounts.get_mut(to) {
            Some(target) => source.transfer_to(target, amount),
            None => Err(LedgerError::unknown_account(to)),
        };
        self.accounts.insert(from.to_string(), source);
        result
    }

    fn accounts(&self) -> Vec<Account> {
        self.sorted().into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn registry_with(accounts: &[(&str, i64)]) -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        for &(number, balance) in accounts {
            registry.open(number, "Owner", dec(balance)).unwrap();
        }
        registry
    }

    #[test]
    fn test_new_creates_empty_registry() {
        let registry = AccountRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.accounts().is_empty());
    }

    #[test]
    fn test_open_inserts_account() {
        let mut registry = AccountRegistry::new();
        let receipt = registry.open("ACC-1", "Ada", dec(50)).unwrap();

        assert_eq!(receipt.balance, dec(50));
        assert_eq!(receipt.message, "Account ACC-1 opened for Ada");
        assert_eq!(registry.get("ACC-1").unwrap().owner_name(), "Ada");
    }

    #[test]
    fn test_open_rejects_duplicates() {
        let mut registry = registry_with(&[("ACC-1", 10)]);
        let result = registry.open("ACC-1", "Eve", dec(999));

        assert_eq!(
            result,
            Err(LedgerError::DuplicateAccount { account: "ACC-1".to_string() })
        );
        assert_eq!(registry.get("ACC-1").unwrap().balance(), dec(10));
    }

    #[test]
    fn test_open_propagates_construction_errors() {
        let mut registry = AccountRegistry::new();
        assert_eq!(
            registry.open("ACC-1", "", dec(0)),
            Err(LedgerError::InvalidOwnerName)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_with_account_unknown() {
        let mut registry = AccountRegistry::new();
        let result = registry.with_account("nope", |account| account.deposit(dec(1)));
        assert_eq!(result, Err(LedgerError::unknown_account("nope")));
    }

    #[test]
    fn test_transfer_between_registered_accounts() {
        let mut registry = registry_with(&[("A", 700), ("B", 100)]);

        registry.transfer("A", "B", dec(250)).unwrap();

        assert_eq!(registry.get("A").unwrap().balance(), dec(450));
        assert_eq!(registry.get("B").unwrap().balance(), dec(350));
    }

    #[test]
    fn test_failed_transfer_keeps_source_registered() {
        let mut registry = registry_with(&[("A", 10), ("B", 0)]);

        let result = registry.transfer("A", "B", dec(50));
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("A").unwrap().balance(), dec(10));
    }

    #[test]
    fn test_transfer_rejects_self_and_unknown() {
        let mut registry = registry_with(&[("A", 10)]);

        assert_eq!(
            registry.transfer("A", "A", dec(1)),
            Err(LedgerError::SelfTransfer { account: "A".to_string() })
        );
        assert_eq!(
            registry.transfer("A", "Z", dec(1)),
            Err(LedgerError::unknown_account("Z"))
        );
        assert_eq!(
            registry.transfer("Z", "A", dec(1)),
            Err(LedgerError::unknown_account("Z"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_accounts_sorted_by_number() {
        let registry = registry_with(&[("C", 1), ("A", 1), ("B", 1)]);
        let numbers: Vec<String> = registry
            .accounts()
            .iter()
            .map(|a| a.account_number().to_string())
            .collect();
        assert_eq!(numbers, vec!["A", "B", "C"]);
    }
}
