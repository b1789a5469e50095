//! Loan book and repayment allocation
//!
//! Repayments are amortized greedily, oldest loan first: each loan is paid off
//! in full before the next one is touched, and the first loan that cannot be
//! paid off in full absorbs what is left.
//!
//! Allocation happens in two steps. [`LoanBook::plan_repayment`] is pure and
//! returns a [`RepaymentPlan`]; [`LoanBook::apply`] writes it. Callers finish
//! every validation between the two, so a rejected repayment never touches the
//! book.
//!
//! Settled loans stay in the book with `remaining == 0`.

use crate::types::Loan;
use rust_decimal::Decimal;

/// Per-loan allocation of one repayment
#[derive(Debug, Clone, PartialEq)]
pub struct RepaymentPlan {
    /// Amount actually applied, `min(requested, outstanding)`
    pub repaid: Decimal,

    /// `(loan index, amount allocated)` in allocation order
    pub allocations: Vec<(usize, Decimal)>,
}

/// Ordered collection of loans, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanBook {
    loans: Vec<Loan>,
}

impl LoanBook {
    /// Create an empty loan book
    pub fn new() -> Self {
        LoanBook { loans: Vec::new() }
    }

    /// Record a new loan at the end of the book
    pub fn issue(&mut self, amount: Decimal) {
        self.loans.push(Loan::new(amount));
    }

    /// Sum of the remaining amount over all loans
    ///
    /// New debt is checked with [`debt_after`](Self::debt_after) before it is
    /// issued, so the sum stays representable.
    pub fn outstanding(&self) -> Decimal {
        self.loans
            .iter()
            .fold(Decimal::ZERO, |total, loan| total.saturating_add(loan.remaining))
    }

    /// Total debt after issuing a loan of `amount`, `None` on overflow
    pub fn debt_after(&self, amount: Decimal) -> Option<Decimal> {
        self.outstanding().checked_add(amount)
    }

    /// Whether any loan still has a positive remaining amount
    pub fn has_active(&self) -> bool {
        self.loans.iter().any(|loan| !loan.is_settled())
    }

    /// All loans, settled ones included
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Compute how `amount` would be spread over the outstanding loans
    pub fn plan_repayment(&self, amount: Decimal) -> RepaymentPlan {
        let repaid = amount.min(self.outstanding());
        let mut budget = repaid;
        let mut allocations = Vec::new();

        for (index, loan) in self.loans.iter().enumerate() {
            if budget.is_zero() {
                break;
            }
            if loan.is_settled() {
                continue;
            }
            let share = budget.min(loan.remaining);
            allocations.push((index, share));
            budget -= share;
        }

        RepaymentPlan {
            repaid,
            allocations,
        }
    }

    /// Apply a plan produced by [`plan_repayment`](Self::plan_repayment) on this book
    pub fn apply(&mut self, plan: &RepaymentPlan) {
        for &(index, share) in &plan.allocations {
            if let Some(loan) = self.loans.get_mut(index) {
                loan.remaining -= share.min(loan.remaining);
            }
        }
    }

    /// Drop every loan (account closure only)
    pub(crate) fn clear(&mut self) {
        self.loans.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn book(amounts: &[i64]) -> LoanBook {
        let mut book = LoanBook::new();
        for &amount in amounts {
            book.issue(dec(amount));
        }
        book
    }

    fn remaining(book: &LoanBook) -> Vec<Decimal> {
        book.loans().iter().map(|loan| loan.remaining).collect()
    }

    #[test]
    fn test_issue_appends_fresh_loan() {
        let book = book(&[300]);
        assert_eq!(book.loans(), &[Loan::new(dec(300))]);
        assert_eq!(book.outstanding(), dec(300));
        assert!(book.has_active());
    }

    #[rstest]
    #[case::partial_first(&[100, 200], 60, &[40, 200], 60)]
    #[case::exact_first(&[100, 200], 100, &[0, 200], 100)]
    #[case::spills_into_second(&[100, 200], 150, &[0, 150], 150)]
    #[case::clears_all(&[100, 200], 300, &[0, 0], 300)]
    #[case::capped_at_debt(&[100, 200], 500, &[0, 0], 300)]
    #[case::three_loans(&[50, 50, 50], 120, &[0, 0, 30], 120)]
    fn test_repayment_allocates_oldest_first(
        #[case] loans: &[i64],
        #[case] amount: i64,
        #[case] expected: &[i64],
        #[case] expected_repaid: i64,
    ) {
        let mut book = book(loans);
        let plan = book.plan_repayment(dec(amount));
        assert_eq!(plan.repaid, dec(expected_repaid));

        book.apply(&plan);
        let expected: Vec<Decimal> = expected.iter().map(|&v| dec(v)).collect();
        assert_eq!(remaining(&book), expected);
    }

    #[test]
    fn test_settled_loans_are_retained_and_skipped() {
        let mut book = book(&[100, 200]);
        let plan = book.plan_repayment(dec(100));
        book.apply(&plan);
        assert_eq!(book.loans().len(), 2);
        assert!(book.loans()[0].is_settled());

        let plan = book.plan_repayment(dec(50));
        assert_eq!(plan.allocations, vec![(1, dec(50))]);
        book.apply(&plan);
        assert_eq!(remaining(&book), vec![dec(0), dec(150)]);
    }

    #[test]
    fn test_plan_is_pure() {
        let book = book(&[100]);
        let _ = book.plan_repayment(dec(40));
        assert_eq!(book.outstanding(), dec(100));
    }

    #[test]
    fn test_fully_settled_book_has_no_active_loan() {
        let mut book = book(&[10]);
        let plan = book.plan_repayment(dec(10));
        book.apply(&plan);
        assert!(!book.has_active());
        assert_eq!(book.outstanding(), Decimal::ZERO);
        assert!(!LoanBook::new().has_active());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: repayment never exceeds the debt and never drives a loan negative,
        /// and each loan's original minus its allocations equals its remaining amount.
        #[test]
        fn repayment_conserves_totals(
            loans in prop::collection::vec(1i64..10_000i64, 1..8),
            payments in prop::collection::vec(1i64..5_000i64, 1..8),
        ) {
            let mut book = book(&loans);
            let mut allocated = vec![Decimal::ZERO; loans.len()];

            for payment in payments {
                let debt_before = book.outstanding();
                let plan = book.plan_repayment(dec(payment));
                prop_assert_eq!(plan.repaid, dec(payment).min(debt_before));
                for &(index, share) in &plan.allocations {
                    allocated[index] += share;
                }
                book.apply(&plan);
                prop_assert_eq!(book.outstanding(), debt_before - plan.repaid);
            }

            for (loan, allocated) in book.loans().iter().zip(allocated) {
                prop_assert!(loan.remaining >= Decimal::ZERO);
                prop_assert_eq!(loan.original - allocated, loan.remaining);
            }
        }

        /// Property: splitting a repayment in two leaves the same loans as paying it at once.
        #[test]
        fn split_repayment_matches_single(
            loans in prop::collection::vec(1i64..10_000i64, 1..8),
            first in 1i64..10_000i64,
            second in 1i64..10_000i64,
        ) {
            let mut split = book(&loans);
            let plan = split.plan_repayment(dec(first));
            split.apply(&plan);
            let plan = split.plan_repayment(dec(second));
            split.apply(&plan);

            let mut single = book(&loans);
            let plan = single.plan_repayment(dec(first + second));
            single.apply(&plan);

            prop_assert_eq!(remaining(&split), remaining(&single));
        }
    }
}
