//! Append-only transaction ledger
//!
//! The ledger is the single source of truth for an account's balance. No
//! running total is kept: the balance is the fold of every entry by kind, so it
//! can never drift from the recorded history.

use crate::types::{EntryKind, LedgerEntry};
use rust_decimal::Decimal;

/// Chronological list of ledger entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Ledger {
            entries: Vec::new(),
        }
    }

    /// Current balance: credits minus debits over the whole history
    ///
    /// O(n) in the number of entries; no side effects. Every prefix of the
    /// fold was checked by [`projected_balance`](Self::projected_balance)
    /// before its entry was appended, so the saturating add never saturates.
    pub fn balance(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |balance, entry| {
                balance.saturating_add(entry.kind.signed(entry.amount))
            })
    }

    /// Balance after appending `amount` of `kind`, or `None` on overflow
    pub fn projected_balance(&self, kind: EntryKind, amount: Decimal) -> Option<Decimal> {
        self.balance().checked_add(kind.signed(amount))
    }

    /// Append an entry and return a copy of it
    ///
    /// `balance_after` must come from [`projected_balance`](Self::projected_balance)
    /// for the same kind and amount. Callers validate before appending; the
    /// ledger itself accepts any positive amount.
    pub(crate) fn record(
        &mut self,
        kind: EntryKind,
        amount: Decimal,
        balance_after: Decimal,
    ) -> LedgerEntry {
        debug_assert_eq!(self.projected_balance(kind, amount), Some(balance_after));
        let entry = LedgerEntry {
            kind,
            amount,
            balance_after,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (account closure only)
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
