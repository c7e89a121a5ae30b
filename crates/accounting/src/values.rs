//! Money payloads carried by one ledger period.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Capability bound for the figures stored under one period.
///
/// The timeline container is generic over this trait so the three ledger
/// kinds (credit, budget, contact balance) share one temporal engine
/// instead of three copy-pasted collections.
pub trait PeriodValues: Clone + Default + PartialEq + fmt::Debug {
    /// Stock-like values (running balances) open each period with the
    /// previous period's closing values, and movements posted into an
    /// earlier period flow through to every later one. Flow-like values
    /// (per-period budget figures) stand alone.
    const CARRIES_FORWARD: bool;

    /// The zero-valued payload used when a period has no figures.
    fn zero() -> Self {
        Self::default()
    }

    /// Pairwise field sum. Commutative; used for group rollups and
    /// year-to-date accumulation.
    fn sum(&self, other: &Self) -> Self;

    /// Apply one signed posting movement to this period's figures.
    fn apply_movement(&mut self, amount: Decimal);
}

/// Figures for a credit-bearing account: the configured credit limit and
/// the running balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditValues {
    pub credit: Decimal,
    pub balance: Decimal,
}

impl CreditValues {
    pub fn new(credit: Decimal, balance: Decimal) -> Self {
        Self { credit, balance }
    }

    /// Room left under the credit limit. Negative means overdrawn.
    pub fn available(&self) -> Decimal {
        self.credit - self.balance.max(Decimal::ZERO)
    }
}

impl PeriodValues for CreditValues {
    const CARRIES_FORWARD: bool = true;

    fn sum(&self, other: &Self) -> Self {
        Self {
            credit: self.credit + other.credit,
            balance: self.balance + other.balance,
        }
    }

    fn apply_movement(&mut self, amount: Decimal) {
        self.balance += amount;
    }
}

/// Budget figures for one period: expected income and expenses plus the
/// postings actually recorded against them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetValues {
    pub income: Decimal,
    pub expenses: Decimal,
    pub posted: Decimal,
}

impl BudgetValues {
    pub fn new(income: Decimal, expenses: Decimal) -> Self {
        Self {
            income,
            expenses,
            posted: Decimal::ZERO,
        }
    }

    /// Signed budget: income minus expenses. Expense budgets come out
    /// negative, matching the signed posting convention.
    pub fn budget(&self) -> Decimal {
        self.income - self.expenses
    }

    pub fn available(&self) -> Decimal {
        self.budget() - self.posted
    }
}

impl PeriodValues for BudgetValues {
    const CARRIES_FORWARD: bool = false;

    fn sum(&self, other: &Self) -> Self {
        Self {
            income: self.income + other.income,
            expenses: self.expenses + other.expenses,
            posted: self.posted + other.posted,
        }
    }

    fn apply_movement(&mut self, amount: Decimal) {
        self.posted += amount;
    }
}

/// Running balance of a contact (payable/receivable) account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceValues {
    pub balance: Decimal,
}

impl BalanceValues {
    pub fn new(balance: Decimal) -> Self {
        Self { balance }
    }
}

impl PeriodValues for BalanceValues {
    const CARRIES_FORWARD: bool = true;

    fn sum(&self, other: &Self) -> Self {
        Self {
            balance: self.balance + other.balance,
        }
    }

    fn apply_movement(&mut self, amount: Decimal) {
        self.balance += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_ignores_credit_balances() {
        // A negative balance does not free up more than the limit.
        let v = CreditValues::new(Decimal::from(100), Decimal::from(-40));
        assert_eq!(v.available(), Decimal::from(100));

        let v = CreditValues::new(Decimal::from(100), Decimal::from(150));
        assert_eq!(v.available(), Decimal::from(-50));
    }

    #[test]
    fn budget_is_income_minus_expenses() {
        let income = BudgetValues::new(Decimal::from(1000), Decimal::ZERO);
        assert_eq!(income.budget(), Decimal::from(1000));

        let expense = BudgetValues::new(Decimal::ZERO, Decimal::from(500));
        assert_eq!(expense.budget(), Decimal::from(-500));
        assert_eq!(expense.available(), Decimal::from(-500));
    }

    #[test]
    fn sum_is_fieldwise() {
        let a = BudgetValues {
            income: Decimal::from(10),
            expenses: Decimal::from(3),
            posted: Decimal::from(4),
        };
        let b = BudgetValues {
            income: Decimal::from(5),
            expenses: Decimal::from(2),
            posted: Decimal::from(-1),
        };
        let s = a.sum(&b);
        assert_eq!(s.income, Decimal::from(15));
        assert_eq!(s.expenses, Decimal::from(5));
        assert_eq!(s.posted, Decimal::from(3));
        assert_eq!(a.sum(&b), b.sum(&a));
    }

    #[test]
    fn movements_hit_the_right_field() {
        let mut c = CreditValues::default();
        c.apply_movement(Decimal::from(25));
        assert_eq!(c.balance, Decimal::from(25));
        assert_eq!(c.credit, Decimal::ZERO);

        let mut b = BudgetValues::new(Decimal::from(100), Decimal::ZERO);
        b.apply_movement(Decimal::from(-10));
        assert_eq!(b.posted, Decimal::from(-10));
        assert_eq!(b.budget(), Decimal::from(100));
    }
}
