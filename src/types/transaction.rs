//! Ledger and operation types
//!
//! This module defines the records an account keeps in its ledger and the
//! operation records a caller submits to mutate accounts.

use rust_decimal::Decimal;
use std::fmt;

/// Account identifier
pub type AccountNumber = String;

/// Kind of a ledger entry
///
/// Credits increase the derived balance, debits decrease it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Funds paid into the account (including the initial balance)
    Deposit,
    /// Funds paid out of the account
    Withdrawal,
    /// Interest credited on a positive balance
    Interest,
    /// Funds received from another account
    TransferIn,
    /// Funds sent to another account
    TransferOut,
    /// Credit extended by a new loan
    Loan,
    /// Funds applied against outstanding loans
    LoanRepayment,
}

impl EntryKind {
    /// Whether entries of this kind add to the balance
    pub fn is_credit(self) -> bool {
        matches!(
            self,
            EntryKind::Deposit | EntryKind::Interest | EntryKind::TransferIn | EntryKind::Loan
        )
    }

    /// Signed contribution of an entry of this kind to the balance
    pub fn signed(self, amount: Decimal) -> Decimal {
        if self.is_credit() {
            amount
        } else {
            -amount
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdrawal => "Withdrawal",
            EntryKind::Interest => "Interest",
            EntryKind::TransferIn => "Transfer In",
            EntryKind::TransferOut => "Transfer Out",
            EntryKind::Loan => "Loan",
            EntryKind::LoanRepayment => "Loan Repayment",
        };
        // pad() so that width specifiers in statements apply
        f.pad(label)
    }
}

/// One immutable row of an account ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// What kind of movement this is
    pub kind: EntryKind,

    /// Absolute amount moved (always positive)
    pub amount: Decimal,

    /// Balance immediately after this entry was appended
    ///
    /// Informational only: the balance is always re-derived from the
    /// sequence of kinds and amounts.
    pub balance_after: Decimal,
}

/// Operations a caller can submit against an account store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Create a new account
    Open,
    /// Credit funds
    Deposit,
    /// Debit funds
    Withdraw,
    /// Move funds to another account
    Transfer,
    /// Take out a loan
    Loan,
    /// Repay outstanding loans
    Repay,
    /// Credit interest on the current balance
    Interest,
    /// Block all fund movements
    Freeze,
    /// Lift a freeze
    Unfreeze,
    /// Set the minimum balance threshold
    Minimum,
    /// Rename the account owner
    Owner,
    /// Wipe and close the account
    Close,
}

impl OperationType {
    /// Parse an operation name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        let op = match name.to_lowercase().as_str() {
            "open" => OperationType::Open,
            "deposit" => OperationType::Deposit,
            "withdraw" | "withdrawal" => OperationType::Withdraw,
            "transfer" => OperationType::Transfer,
            "loan" => OperationType::Loan,
            "repay" => OperationType::Repay,
            "interest" => OperationType::Interest,
            "freeze" => OperationType::Freeze,
            "unfreeze" => OperationType::Unfreeze,
            "minimum" => OperationType::Minimum,
            "owner" => OperationType::Owner,
            "close" => OperationType::Close,
            _ => return None,
        };
        Some(op)
    }

    /// Lowercase name as written in scripts
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Open => "open",
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
            OperationType::Transfer => "transfer",
            OperationType::Loan => "loan",
            OperationType::Repay => "repay",
            OperationType::Interest => "interest",
            OperationType::Freeze => "freeze",
            OperationType::Unfreeze => "unfreeze",
            OperationType::Minimum => "minimum",
            OperationType::Owner => "owner",
            OperationType::Close => "close",
        }
    }
}

/// A single validated operation request
///
/// Optional fields are only meaningful for the operations that use them:
/// `target` for transfers, `amount` for fund movements, thresholds, rates and
/// initial balances, `owner` for `open` and `owner`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    /// Operation to perform
    pub op: OperationType,

    /// Account the operation applies to (the source, for transfers)
    pub account: AccountNumber,

    /// Destination account for transfers
    pub target: Option<AccountNumber>,

    /// Amount, rate or threshold
    pub amount: Option<Decimal>,

    /// Owner name for `open` and `owner`
    pub owner: Option<String>,
}

impl OperationRecord {
    /// Build a record with only an operation and account
    pub fn new(op: OperationType, account: impl Into<AccountNumber>) -> Self {
        OperationRecord {
            op,
            account: account.into(),
            target: None,
            amount: None,
            owner: None,
        }
    }

    /// Set the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the transfer target
    pub fn with_target(mut self, target: impl Into<AccountNumber>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the owner name
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Every account number this operation reads or writes
    pub fn touched_accounts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.account.as_str()).chain(self.target.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntryKind::Deposit, true)]
    #[case(EntryKind::Interest, true)]
    #[case(EntryKind::TransferIn, true)]
    #[case(EntryKind::Loan, true)]
    #[case(EntryKind::Withdrawal, false)]
    #[case(EntryKind::TransferOut, false)]
    #[case(EntryKind::LoanRepayment, false)]
    fn test_entry_kind_direction(#[case] kind: EntryKind, #[case] credit: bool) {
        assert_eq!(kind.is_credit(), credit);
        let signed = kind.signed(Decimal::TEN);
        assert_eq!(signed.is_sign_positive(), credit);
    }

    #[test]
    fn test_entry_kind_display_honours_width() {
        assert_eq!(format!("{:<15}|", EntryKind::LoanRepayment), "Loan Repayment |");
        assert_eq!(EntryKind::TransferIn.to_string(), "Transfer In");
    }

    #[rstest]
    #[case("open", OperationType::Open)]
    #[case("DEPOSIT", OperationType::Deposit)]
    #[case("withdrawal", OperationType::Withdraw)]
    #[case("Repay", OperationType::Repay)]
    #[case("minimum", OperationType::Minimum)]
    fn test_operation_type_parse(#[case] name: &str, #[case] expected: OperationType) {
        assert_eq!(OperationType::parse(name), Some(expected));
    }

    #[test]
    fn test_operation_type_parse_rejects_unknown() {
        assert_eq!(OperationType::parse("dispute"), None);
    }

    #[test]
    fn test_touched_accounts_includes_target() {
        let record = OperationRecord::new(OperationType::Transfer, "A")
            .with_target("B")
            .with_amount(Decimal::ONE);
        let touched: Vec<&str> = record.touched_accounts().collect();
        assert_eq!(touched, vec!["A", "B"]);

        let record = OperationRecord::new(OperationType::Freeze, "A");
        assert_eq!(record.touched_accounts().count(), 1);
    }
}
