//! Human-readable account reports
//!
//! Both reports are read-only projections of an [`Account`]. Amounts are rounded
//! to cents for display only; the ledger keeps full precision.

use crate::core::account::Account;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

const RULE_WIDTH: usize = 45;

/// Format an amount with two decimal places, rounding half away from zero
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

impl Account {
    /// Summary of identity, balance, debt and status
    pub fn details(&self) -> String {
        format!(
            "Account Number: {}\n\
             Account Owner: {}\n\
             Current Balance: ${}\n\
             Outstanding Debt: ${}\n\
             Account Status: {}\n\
             Minimum Balance Required: ${}\n",
            self.account_number(),
            self.owner_name(),
            money(self.balance()),
            money(self.outstanding_debt()),
            self.status(),
            money(self.minimum_balance()),
        )
    }

    /// Every ledger entry in order, followed by loans and the current balance
    pub fn statement(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "___ Account Statement for Account {} ___", self.account_number());
        let _ = writeln!(out, "Owner: {}", self.owner_name());
        let _ = writeln!(out, "{:<15} {:>12} {:>15}", "Type", "Amount", "Balance After");
        let _ = writeln!(out, "{}", rule);
        for entry in self.ledger() {
            let _ = writeln!(
                out,
                "{:<15} {:>12} {:>15}",
                entry.kind,
                money(entry.amount),
                money(entry.balance_after)
            );
        }
        let _ = writeln!(out, "{}", rule);

        if !self.loans().is_empty() {
            let _ = writeln!(out, "{:<15} {:>12} {:>15}", "Loan", "Original", "Remaining");
            for (index, loan) in self.loans().iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:<15} {:>12} {:>15}",
                    format!("#{}", index + 1),
                    money(loan.original),
                    money(loan.remaining)
                );
            }
            let _ = writeln!(out, "{}", rule);
        }

        let _ = writeln!(out, "Current Balance: ${}", money(self.balance()));
        out.push_str("___ End of Statement ___");
        out
    }
}
