//! Group rollups: combined snapshots across the ledgers of one group.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::accounts::{AccountGroup, BudgetAccountGroup, Ledger, LedgerSet};
use crate::period::YearMonth;
use crate::values::{BudgetValues, CreditValues, PeriodValues};

/// Combined four-period snapshot for the ledgers sharing one group.
///
/// Each period is the pairwise sum of the member ledgers' own lookups for
/// that period; summation is commutative, so the result is deterministic
/// regardless of member iteration order. An empty group is a zero-valued
/// status, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatus<G, V> {
    pub group: G,
    pub values_for_month_of_status_date: V,
    pub values_for_last_month_of_status_date: V,
    pub values_for_year_to_date_of_status_date: V,
    pub values_for_last_year_of_status_date: V,
}

pub type AccountGroupStatus = GroupStatus<AccountGroup, CreditValues>;
pub type BudgetAccountGroupStatus = GroupStatus<BudgetAccountGroup, BudgetValues>;

impl<G, V: PeriodValues> GroupStatus<G, V> {
    pub fn calculate<'a, L>(
        group: G,
        members: impl IntoIterator<Item = &'a L>,
        status_date: NaiveDate,
    ) -> Self
    where
        L: Ledger<Values = V> + 'a,
    {
        let status = YearMonth::from_date(status_date);
        let last_month = status.pred();

        let mut month = V::zero();
        let mut prior_month = V::zero();
        let mut year_to_date = V::zero();
        let mut last_year = V::zero();
        for member in members {
            let timeline = member.timeline();
            month = month.sum(&timeline.month_of(status));
            prior_month = prior_month.sum(&timeline.month_of(last_month));
            year_to_date = year_to_date.sum(&timeline.year_to_date(status));
            last_year = last_year.sum(&timeline.end_of_last_year(status).values);
        }

        Self {
            group,
            values_for_month_of_status_date: month,
            values_for_last_month_of_status_date: prior_month,
            values_for_year_to_date_of_status_date: year_to_date,
            values_for_last_year_of_status_date: last_year,
        }
    }
}

/// Rollups for every account group present in the set, ordered by group
/// number.
pub fn account_group_statuses(set: &LedgerSet, status_date: NaiveDate) -> Vec<AccountGroupStatus> {
    let mut groups: BTreeMap<u32, AccountGroup> = BTreeMap::new();
    for account in set.accounts() {
        groups
            .entry(account.group().number)
            .or_insert_with(|| account.group().clone());
    }
    groups
        .into_values()
        .map(|group| {
            let number = group.number;
            GroupStatus::calculate(
                group,
                set.accounts().filter(|a| a.group().number == number),
                status_date,
            )
        })
        .collect()
}

/// Rollups for every budget-account group present in the set, ordered by
/// group number.
pub fn budget_account_group_statuses(
    set: &LedgerSet,
    status_date: NaiveDate,
) -> Vec<BudgetAccountGroupStatus> {
    let mut groups: BTreeMap<u32, BudgetAccountGroup> = BTreeMap::new();
    for account in set.budget_accounts() {
        groups
            .entry(account.group().number)
            .or_insert_with(|| account.group().clone());
    }
    groups
        .into_values()
        .map(|group| {
            let number = group.number;
            GroupStatus::calculate(
                group,
                set.budget_accounts().filter(|a| a.group().number == number),
                status_date,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::accounts::{Account, AccountNumber, BudgetAccount, BudgetCategory};
    use crate::values::BudgetValues;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn credit_group() -> AccountGroup {
        AccountGroup {
            number: 1,
            name: "Liquid".to_string(),
        }
    }

    fn credit_account(number: &str, balances: &[(u32, i64)]) -> Account {
        let mut account = Account::new(
            AccountNumber::new(number).unwrap(),
            number.to_string(),
            credit_group(),
        );
        for (month, balance) in balances {
            account.timeline_mut().insert(
                ym(2024, *month),
                CreditValues::new(Decimal::from(100), Decimal::from(*balance)),
            );
        }
        account
    }

    #[test]
    fn empty_group_is_zero_valued() {
        let status = AccountGroupStatus::calculate(
            credit_group(),
            std::iter::empty::<&Account>(),
            date(2024, 3, 15),
        );
        assert_eq!(
            status.values_for_month_of_status_date,
            CreditValues::default()
        );
        assert_eq!(
            status.values_for_last_year_of_status_date,
            CreditValues::default()
        );
    }

    #[test]
    fn periods_sum_across_members() {
        let a = credit_account("A", &[(2, 10), (3, 40)]);
        let b = credit_account("B", &[(3, 60)]);

        let status =
            AccountGroupStatus::calculate(credit_group(), [&a, &b], date(2024, 3, 15));
        assert_eq!(
            status.values_for_month_of_status_date.balance,
            Decimal::from(100)
        );
        assert_eq!(
            status.values_for_last_month_of_status_date.balance,
            Decimal::from(10)
        );
        // Both members' credit limits sum in every populated period.
        assert_eq!(
            status.values_for_month_of_status_date.credit,
            Decimal::from(200)
        );
    }

    #[test]
    fn budget_year_to_date_is_a_range_sum() {
        let group = BudgetAccountGroup {
            number: 10,
            name: "Household".to_string(),
            category: BudgetCategory::Expense,
        };
        let mut account = BudgetAccount::new(
            AccountNumber::new("3010").unwrap(),
            "Groceries",
            group.clone(),
        );
        for month in 1..=3u32 {
            let mut values = BudgetValues::new(Decimal::ZERO, Decimal::from(500));
            values.posted = Decimal::from(-400);
            account.timeline_mut().insert(ym(2024, month), values);
        }

        let status =
            BudgetAccountGroupStatus::calculate(group, [&account], date(2024, 3, 15));
        assert_eq!(
            status.values_for_year_to_date_of_status_date.posted,
            Decimal::from(-1200)
        );
        assert_eq!(
            status.values_for_year_to_date_of_status_date.budget(),
            Decimal::from(-1500)
        );
        assert_eq!(
            status.values_for_month_of_status_date.posted,
            Decimal::from(-400)
        );
    }

    proptest! {
        /// Aggregation over {A, B} equals aggregation over {B, A} for
        /// every period.
        #[test]
        fn aggregation_is_commutative(
            a_balances in prop::collection::vec((1u32..=12, -1000i64..1000), 0..6),
            b_balances in prop::collection::vec((1u32..=12, -1000i64..1000), 0..6),
        ) {
            let mut a = credit_account("A", &[]);
            for (month, balance) in &a_balances {
                a.timeline_mut().post(ym(2024, *month), Decimal::from(*balance));
            }
            let mut b = credit_account("B", &[]);
            for (month, balance) in &b_balances {
                b.timeline_mut().post(ym(2024, *month), Decimal::from(*balance));
            }

            let ab = AccountGroupStatus::calculate(credit_group(), [&a, &b], date(2024, 6, 30));
            let ba = AccountGroupStatus::calculate(credit_group(), [&b, &a], date(2024, 6, 30));
            prop_assert_eq!(
                ab.values_for_month_of_status_date,
                ba.values_for_month_of_status_date
            );
            prop_assert_eq!(
                ab.values_for_last_month_of_status_date,
                ba.values_for_last_month_of_status_date
            );
            prop_assert_eq!(
                ab.values_for_year_to_date_of_status_date,
                ba.values_for_year_to_date_of_status_date
            );
            prop_assert_eq!(
                ab.values_for_last_year_of_status_date,
                ba.values_for_last_year_of_status_date
            );
        }
    }
}
