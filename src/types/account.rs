//! Account-related value types
//!
//! This module defines the lifecycle state, loan entries and operation receipts
//! shared between the account entity and the stores that hold it.

use rust_decimal::Decimal;
use std::fmt;

/// Lifecycle state of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountStatus {
    /// Accepts every operation
    #[default]
    Active,

    /// Fund movements are blocked; metadata changes are still allowed
    ///
    /// Reversible with `unfreeze`.
    Frozen,

    /// Ledger and loans have been wiped; nothing is accepted any more
    Closed,
}

impl AccountStatus {
    /// Whether fund movements are blocked
    ///
    /// True for both `Frozen` and `Closed`.
    pub fn is_frozen(self) -> bool {
        !matches!(self, AccountStatus::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountStatus::Active => "Active",
            AccountStatus::Frozen => "Frozen",
            AccountStatus::Closed => "Closed",
        };
        f.pad(label)
    }
}

/// One extension of credit and what is still owed on it
///
/// Invariant: `0 <= remaining <= original`, and `remaining` never increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loan {
    /// Amount originally borrowed
    pub original: Decimal,

    /// Amount still outstanding
    pub remaining: Decimal,
}

impl Loan {
    /// A freshly issued loan with nothing repaid
    pub fn new(amount: Decimal) -> Self {
        Loan {
            original: amount,
            remaining: amount,
        }
    }

    /// Whether the loan has been repaid in full
    pub fn is_settled(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Total amount repaid against this loan so far
    pub fn repaid(&self) -> Decimal {
        self.original - self.remaining
    }
}

/// Outcome of a successful account operation
///
/// Carries the human-readable message together with the resulting state so
/// callers do not have to query the account again.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Human-readable description of what happened
    pub message: String,

    /// Balance after the operation
    pub balance: Decimal,

    /// Total outstanding loan debt after the operation
    pub outstanding_debt: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_frozen_gate() {
        assert!(!AccountStatus::Active.is_frozen());
        assert!(AccountStatus::Frozen.is_frozen());
        assert!(AccountStatus::Closed.is_frozen());
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
    }

    #[test]
    fn test_loan_accounting() {
        let mut loan = Loan::new(Decimal::new(300, 0));
        assert!(!loan.is_settled());
        assert_eq!(loan.repaid(), Decimal::ZERO);

        loan.remaining = Decimal::new(210, 0);
        assert_eq!(loan.repaid(), Decimal::new(90, 0));

        loan.remaining = Decimal::ZERO;
        assert!(loan.is_settled());
    }
}
