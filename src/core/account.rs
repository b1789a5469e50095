//! Account entity
//!
//! An [`Account`] owns its ledger and loan book and exposes every operation a
//! caller may perform on it. Each operation validates completely before it
//! mutates anything, so a returned error always means the account is unchanged.
//!
//! Check order for fund movements: lifecycle state first, then the amount, then
//! available funds.

use crate::core::ledger::Ledger;
use crate::core::loan_book::LoanBook;
use crate::core::statement::money;
use crate::types::{
    AccountNumber, AccountStatus, EntryKind, LedgerEntry, LedgerError, Loan, Receipt,
};
use rust_decimal::Decimal;

/// Owner name written over a closed account
pub const CLOSED_OWNER: &str = "None";

/// A single customer account
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    account_number: AccountNumber,
    owner_name: String,
    ledger: Ledger,
    loans: LoanBook,
    status: AccountStatus,
    minimum_balance: Decimal,
}

impl Account {
    /// Open a new account
    ///
    /// A positive `initial_balance` is recorded as a `Deposit` entry; zero opens
    /// an empty ledger.
    ///
    /// # Errors
    ///
    /// - `InvalidAccountNumber` if the number is blank
    /// - `InvalidOwnerName` if the owner is blank
    /// - `InvalidInitialBalance` if the balance is negative
    pub fn new(
        account_number: impl Into<AccountNumber>,
        owner_name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, LedgerError> {
        let account_number = account_number.into();
        let owner_name = owner_name.into();

        if account_number.trim().is_empty() {
            return Err(LedgerError::InvalidAccountNumber);
        }
        if owner_name.trim().is_empty() {
            return Err(LedgerError::InvalidOwnerName);
        }
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::InvalidInitialBalance {
                amount: initial_balance,
            });
        }

        let mut ledger = Ledger::new();
        if initial_balance > Decimal::ZERO {
            ledger.record(EntryKind::Deposit, initial_balance, initial_balance);
        }

        Ok(Account {
            account_number,
            owner_name,
            ledger,
            loans: LoanBook::new(),
            status: AccountStatus::Active,
            minimum_balance: Decimal::ZERO,
        })
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_frozen(&self) -> bool {
        self.status.is_frozen()
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.minimum_balance
    }

    /// Ledger entries in chronological order
    pub fn ledger(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }

    /// Loans in issue order, settled ones included
    pub fn loans(&self) -> &[Loan] {
        self.loans.loans()
    }

    /// Current balance, derived from the ledger on every call
    pub fn balance(&self) -> Decimal {
        self.ledger.balance()
    }

    /// Total remaining debt over all loans
    pub fn outstanding_debt(&self) -> Decimal {
        self.loans.outstanding()
    }

    /// Credit funds
    pub fn deposit(&mut self, amount: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        ensure_positive(amount)?;
        let after = self.project(EntryKind::Deposit, amount, "deposit")?;

        let entry = self.ledger.record(EntryKind::Deposit, amount, after);
        Ok(self.receipt(format!(
            "Deposit successful. New balance: ${}",
            money(entry.balance_after)
        )))
    }

    /// Debit funds, keeping the balance at or above the minimum balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        ensure_positive(amount)?;
        let after = self.ensure_outflow_allowed(EntryKind::Withdrawal, amount)?;

        let entry = self.ledger.record(EntryKind::Withdrawal, amount, after);
        Ok(self.receipt(format!(
            "Withdrawal successful. New balance: ${}",
            money(entry.balance_after)
        )))
    }

    /// Move funds into `target`'s ledger
    ///
    /// Both appends happen inside this call; the borrow on `target` guarantees no
    /// one else observes it in between. Concurrent stores must lock both accounts
    /// before calling this (see `SharedRegistry::transfer`).
    pub fn transfer_to(
        &mut self,
        target: &mut Account,
        amount: Decimal,
    ) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        if target.is_frozen() {
            return Err(LedgerError::TargetFrozen {
                account: target.account_number.clone(),
            });
        }
        ensure_positive(amount)?;
        let source_after = self.ensure_outflow_allowed(EntryKind::TransferOut, amount)?;
        let target_after = target.project(EntryKind::TransferIn, amount, "transfer")?;

        self.ledger.record(EntryKind::TransferOut, amount, source_after);
        target.ledger.record(EntryKind::TransferIn, amount, target_after);
        Ok(self.receipt(format!(
            "Transfer of ${} to {} successful",
            money(amount),
            target.owner_name
        )))
    }

    /// Borrow funds
    ///
    /// The loan is credited to the ledger immediately; there is no approval step.
    pub fn request_loan(&mut self, amount: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        ensure_positive(amount)?;
        let after = self.project(EntryKind::Loan, amount, "loan")?;
        if self.loans.debt_after(amount).is_none() {
            return Err(LedgerError::arithmetic_overflow("loan", &self.account_number));
        }

        self.loans.issue(amount);
        let entry = self.ledger.record(EntryKind::Loan, amount, after);
        Ok(self.receipt(format!(
            "Loan of ${} registered and approved. New balance: ${}",
            money(amount),
            money(entry.balance_after)
        )))
    }

    /// Repay outstanding loans, oldest first
    ///
    /// The debit is capped at the outstanding debt: offering more than is owed
    /// only repays what is owed. The uncapped `amount` must still be covered by
    /// the current balance.
    pub fn repay_loan(&mut self, amount: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        ensure_positive(amount)?;
        if !self.loans.has_active() {
            return Err(LedgerError::NoActiveLoan {
                account: self.account_number.clone(),
            });
        }
        let balance = self.balance();
        if amount > balance {
            return Err(LedgerError::insufficient_funds(
                &self.account_number,
                balance,
                amount,
                self.minimum_balance,
            ));
        }

        let plan = self.loans.plan_repayment(amount);
        let after = self.project(EntryKind::LoanRepayment, plan.repaid, "repayment")?;
        self.loans.apply(&plan);
        self.ledger.record(EntryKind::LoanRepayment, plan.repaid, after);
        Ok(self.receipt(format!(
            "Loan repayment of ${} successful. Remaining debt: ${}",
            money(plan.repaid),
            money(self.outstanding_debt())
        )))
    }

    /// Credit `balance * rate` as interest
    ///
    /// `rate` is a fraction in `[0, 1]` (0.05 for 5%).
    pub fn apply_interest(&mut self, rate: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(LedgerError::InvalidRate { rate });
        }
        let balance = self.balance();
        if balance <= Decimal::ZERO {
            return Err(LedgerError::NoPositiveBalance {
                account: self.account_number.clone(),
                balance,
            });
        }

        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LedgerError::arithmetic_overflow("interest", &self.account_number))?;
        let after = self.project(EntryKind::Interest, interest, "interest")?;
        let entry = self.ledger.record(EntryKind::Interest, interest, after);
        Ok(self.receipt(format!(
            "Interest of ${} applied. New balance: ${}",
            money(interest),
            money(entry.balance_after)
        )))
    }

    pub fn freeze(&mut self) -> Result<Receipt, LedgerError> {
        match self.status {
            AccountStatus::Closed => Err(LedgerError::account_closed(&self.account_number)),
            AccountStatus::Frozen => Err(LedgerError::AlreadyFrozen {
                account: self.account_number.clone(),
            }),
            AccountStatus::Active => {
                self.status = AccountStatus::Frozen;
                Ok(self.receipt("Account has been frozen".to_string()))
            }
        }
    }

    /// Lift a freeze
    ///
    /// Closed accounts cannot be brought back this way.
    pub fn unfreeze(&mut self) -> Result<Receipt, LedgerError> {
        match self.status {
            AccountStatus::Closed => Err(LedgerError::account_closed(&self.account_number)),
            AccountStatus::Active => Err(LedgerError::NotFrozen {
                account: self.account_number.clone(),
            }),
            AccountStatus::Frozen => {
                self.status = AccountStatus::Active;
                Ok(self.receipt("Account has been unfrozen".to_string()))
            }
        }
    }

    /// Set the floor for withdrawals and outgoing transfers
    ///
    /// Allowed while frozen. The current balance is not checked against the new
    /// threshold.
    pub fn set_minimum_balance(&mut self, amount: Decimal) -> Result<Receipt, LedgerError> {
        self.ensure_open()?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        self.minimum_balance = amount;
        Ok(self.receipt(format!("Minimum balance set to: ${}", money(amount))))
    }

    pub fn change_owner(&mut self, new_owner: impl Into<String>) -> Result<Receipt, LedgerError> {
        self.ensure_open()?;
        let new_owner = new_owner.into();
        if new_owner.trim().is_empty() {
            return Err(LedgerError::InvalidOwnerName);
        }

        self.owner_name = new_owner;
        Ok(self.receipt(format!("Account owner changed to: {}", self.owner_name)))
    }

    /// Wipe the account and close it for good
    ///
    /// Only active accounts can be closed; a frozen one must be unfrozen first.
    pub fn close(&mut self) -> Result<Receipt, LedgerError> {
        self.ensure_movable()?;

        self.ledger.clear();
        self.loans.clear();
        self.owner_name = CLOSED_OWNER.to_string();
        self.minimum_balance = Decimal::ZERO;
        self.status = AccountStatus::Closed;
        Ok(self.receipt(format!(
            "Account {} has been closed.",
            self.account_number
        )))
    }

    fn receipt(&self, message: String) -> Receipt {
        Receipt {
            message,
            balance: self.balance(),
            outstanding_debt: self.outstanding_debt(),
        }
    }

    fn ensure_open(&self) -> Result<(), LedgerError> {
        if self.status == AccountStatus::Closed {
            return Err(LedgerError::account_closed(&self.account_number));
        }
        Ok(())
    }

    fn ensure_movable(&self) -> Result<(), LedgerError> {
        match self.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Frozen => Err(LedgerError::account_frozen(&self.account_number)),
            AccountStatus::Closed => Err(LedgerError::account_closed(&self.account_number)),
        }
    }

    /// Balance after appending `kind` for `amount`
    fn project(&self, kind: EntryKind, amount: Decimal, operation: &str) -> Result<Decimal, LedgerError> {
        self.ledger
            .projected_balance(kind, amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, &self.account_number))
    }

    /// Balance after an outflow, rejected below the minimum balance
    fn ensure_outflow_allowed(&self, kind: EntryKind, amount: Decimal) -> Result<Decimal, LedgerError> {
        let balance = self.balance();
        match self.ledger.projected_balance(kind, amount) {
            Some(after) if after >= self.minimum_balance => Ok(after),
            _ => Err(LedgerError::insufficient_funds(
                &self.account_number,
                balance,
                amount,
                self.minimum_balance,
            )),
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}
