//! Temporal container for one ledger's period figures.
//!
//! A [`Timeline`] holds at most one payload per (year, month) and answers
//! point-in-time questions relative to a status date. Absence of data is
//! always a zero-valued answer, never an error.

use std::collections::BTreeMap;
use std::ops::Bound;

use rust_decimal::Decimal;

use crate::period::YearMonth;
use crate::values::PeriodValues;

/// One period's figures within a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodEntry<V> {
    pub period: YearMonth,
    pub values: V,
}

/// The three point-in-time views a ledger exposes for a status date.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSnapshot<V> {
    /// Figures for the status date's own month.
    pub at_status_date: PeriodEntry<V>,
    /// Figures at the end of the month immediately before the status month.
    pub at_end_of_last_month: PeriodEntry<V>,
    /// Figures carried out of the year before the status year: the
    /// chronologically latest entry of that year, wherever it falls.
    pub at_end_of_last_year: PeriodEntry<V>,
}

/// Temporal series of period figures for one ledger.
///
/// The map makes the one-entry-per-period invariant structural and gives
/// queries the canonical (year, month) ascending order for free.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<V: PeriodValues> {
    entries: BTreeMap<YearMonth, V>,
}

impl<V: PeriodValues> Default for Timeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PeriodValues> Timeline<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert figures for a period, replacing any prior entry for the
    /// same period.
    pub fn insert(&mut self, period: YearMonth, values: V) -> Option<V> {
        self.entries.insert(period, values)
    }

    pub fn get(&self, period: YearMonth) -> Option<&V> {
        self.entries.get(&period)
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, &V)> {
        self.entries.iter().map(|(p, v)| (*p, v))
    }

    /// Apply one signed movement to a period.
    ///
    /// An absent period is seeded first: stock-like values open with the
    /// closing values of the latest earlier period, flow-like values open
    /// at zero. For stock-like values the movement also flows into every
    /// later period, keeping running balances consistent when a line is
    /// posted into the past.
    pub fn post(&mut self, period: YearMonth, amount: Decimal) {
        if !self.entries.contains_key(&period) {
            let seed = if V::CARRIES_FORWARD {
                self.entries
                    .range(..period)
                    .next_back()
                    .map(|(_, v)| v.clone())
                    .unwrap_or_else(V::zero)
            } else {
                V::zero()
            };
            self.entries.insert(period, seed);
        }
        if let Some(values) = self.entries.get_mut(&period) {
            values.apply_movement(amount);
        }
        if V::CARRIES_FORWARD {
            for (_, values) in self
                .entries
                .range_mut((Bound::Excluded(period), Bound::Unbounded))
            {
                values.apply_movement(amount);
            }
        }
    }

    /// Figures for exactly this period; zero-valued if absent.
    pub fn month_of(&self, status: YearMonth) -> V {
        self.entries
            .get(&status)
            .cloned()
            .unwrap_or_else(V::zero)
    }

    /// Accumulated figures from January of the status year through the
    /// status month.
    ///
    /// Flow-like values sum over the range; stock-like values take the
    /// latest entry in the range, since a running balance is already
    /// cumulative.
    pub fn year_to_date(&self, status: YearMonth) -> V {
        let mut range = self.entries.range(status.start_of_year()..=status);
        if V::CARRIES_FORWARD {
            range
                .next_back()
                .map(|(_, v)| v.clone())
                .unwrap_or_else(V::zero)
        } else {
            range.fold(V::zero(), |acc, (_, v)| acc.sum(v))
        }
    }

    /// The chronologically latest entry of the year before the status
    /// year; zero-valued (nominal period: December of that year) if the
    /// year has no entries. Prior-year figures may be sparse — the latest
    /// entry wins regardless of which month it falls in.
    pub fn end_of_last_year(&self, status: YearMonth) -> PeriodEntry<V> {
        let last_year = status.year() - 1;
        self.entries
            .range(YearMonth::raw(last_year, 1)..=YearMonth::raw(last_year, 12))
            .next_back()
            .map(|(p, v)| PeriodEntry {
                period: *p,
                values: v.clone(),
            })
            .unwrap_or_else(|| PeriodEntry {
                period: YearMonth::raw(last_year, 12),
                values: V::zero(),
            })
    }

    /// The three point-in-time views for a status date. Pure computation
    /// over the current entries; the timeline is unchanged.
    pub fn snapshot(&self, status: YearMonth) -> TimelineSnapshot<V> {
        let last_month = status.pred();
        TimelineSnapshot {
            at_status_date: PeriodEntry {
                period: status,
                values: self.month_of(status),
            },
            at_end_of_last_month: PeriodEntry {
                period: last_month,
                values: self.month_of(last_month),
            },
            at_end_of_last_year: self.end_of_last_year(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::values::{BalanceValues, BudgetValues, CreditValues};

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn balance(value: i64) -> BalanceValues {
        BalanceValues::new(Decimal::from(value))
    }

    #[test]
    fn empty_timeline_answers_zero_everywhere() {
        let timeline: Timeline<BalanceValues> = Timeline::new();
        let snapshot = timeline.snapshot(ym(2024, 3));
        assert_eq!(snapshot.at_status_date.values, BalanceValues::default());
        assert_eq!(snapshot.at_status_date.period, ym(2024, 3));
        assert_eq!(snapshot.at_end_of_last_month.values, BalanceValues::default());
        assert_eq!(snapshot.at_end_of_last_month.period, ym(2024, 2));
        assert_eq!(snapshot.at_end_of_last_year.values, BalanceValues::default());
        assert_eq!(snapshot.at_end_of_last_year.period, YearMonth::raw(2023, 12));
        assert_eq!(timeline.year_to_date(ym(2024, 3)), BalanceValues::default());
    }

    #[test]
    fn duplicate_period_replaces_rather_than_duplicates() {
        let mut timeline: Timeline<BalanceValues> = Timeline::new();
        timeline.insert(ym(2024, 3), balance(10));
        timeline.insert(ym(2024, 3), balance(25));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.month_of(ym(2024, 3)), balance(25));
    }

    #[test]
    fn snapshot_of_sparse_history() {
        // Status date 2024-03-15 with records 2024-03 (100), 2024-02 (80),
        // 2023-11 (50), 2023-09 (40).
        let mut timeline: Timeline<BalanceValues> = Timeline::new();
        timeline.insert(ym(2024, 3), balance(100));
        timeline.insert(ym(2024, 2), balance(80));
        timeline.insert(ym(2023, 11), balance(50));
        timeline.insert(ym(2023, 9), balance(40));

        let snapshot = timeline.snapshot(ym(2024, 3));
        assert_eq!(snapshot.at_status_date.values.balance, Decimal::from(100));
        assert_eq!(snapshot.at_end_of_last_month.values.balance, Decimal::from(80));
        // Latest of the 2023 records, not December.
        assert_eq!(snapshot.at_end_of_last_year.values.balance, Decimal::from(50));
        assert_eq!(snapshot.at_end_of_last_year.period, ym(2023, 11));
    }

    #[test]
    fn last_month_crosses_year_boundary() {
        let mut timeline: Timeline<BalanceValues> = Timeline::new();
        timeline.insert(ym(2023, 12), balance(70));
        let snapshot = timeline.snapshot(ym(2024, 1));
        assert_eq!(snapshot.at_end_of_last_month.period, ym(2023, 12));
        assert_eq!(snapshot.at_end_of_last_month.values.balance, Decimal::from(70));
    }

    #[test]
    fn posting_seeds_stock_values_from_latest_earlier_period() {
        let mut timeline: Timeline<CreditValues> = Timeline::new();
        timeline.insert(
            ym(2024, 1),
            CreditValues::new(Decimal::from(100), Decimal::from(20)),
        );
        timeline.post(ym(2024, 3), Decimal::from(5));

        let march = timeline.month_of(ym(2024, 3));
        assert_eq!(march.credit, Decimal::from(100));
        assert_eq!(march.balance, Decimal::from(25));
        // February stays absent; only the posted period materializes.
        assert_eq!(timeline.get(ym(2024, 2)), None);
    }

    #[test]
    fn posting_seeds_flow_values_from_zero() {
        let mut timeline: Timeline<BudgetValues> = Timeline::new();
        timeline.insert(ym(2024, 1), BudgetValues::new(Decimal::from(100), Decimal::ZERO));
        timeline.post(ym(2024, 3), Decimal::from(40));

        let march = timeline.month_of(ym(2024, 3));
        assert_eq!(march.income, Decimal::ZERO);
        assert_eq!(march.posted, Decimal::from(40));
    }

    #[test]
    fn backdated_posting_flows_into_later_periods() {
        let mut timeline: Timeline<BalanceValues> = Timeline::new();
        timeline.insert(ym(2024, 1), balance(10));
        timeline.insert(ym(2024, 2), balance(10));
        timeline.insert(ym(2024, 4), balance(10));

        timeline.post(ym(2024, 2), Decimal::from(7));

        assert_eq!(timeline.month_of(ym(2024, 1)).balance, Decimal::from(10));
        assert_eq!(timeline.month_of(ym(2024, 2)).balance, Decimal::from(17));
        assert_eq!(timeline.month_of(ym(2024, 4)).balance, Decimal::from(17));
    }

    #[test]
    fn year_to_date_sums_flows_and_tracks_stocks() {
        let mut budget: Timeline<BudgetValues> = Timeline::new();
        for month in 1..=4 {
            let mut values = BudgetValues::new(Decimal::from(100), Decimal::ZERO);
            values.posted = Decimal::from(10 * month);
            budget.insert(ym(2024, month as u32), values);
        }
        // December of the prior year must not leak into year-to-date.
        budget.insert(ym(2023, 12), BudgetValues::new(Decimal::from(999), Decimal::ZERO));

        let ytd = budget.year_to_date(ym(2024, 3));
        assert_eq!(ytd.income, Decimal::from(300));
        assert_eq!(ytd.posted, Decimal::from(60));

        let mut stock: Timeline<BalanceValues> = Timeline::new();
        stock.insert(ym(2024, 1), balance(10));
        stock.insert(ym(2024, 2), balance(35));
        assert_eq!(stock.year_to_date(ym(2024, 3)).balance, Decimal::from(35));
    }

    proptest! {
        /// The end-of-last-year rule picks the record with the greatest
        /// (year, month) among those classified as "last year of the
        /// status date".
        #[test]
        fn end_of_last_year_is_max_of_prior_year(
            months in prop::collection::btree_set(1u32..=12, 1..8),
            other_year_months in prop::collection::btree_set(1u32..=12, 0..4),
        ) {
            let status = ym(2024, 6);
            let mut timeline: Timeline<BalanceValues> = Timeline::new();
            for &m in &months {
                timeline.insert(ym(2023, m), balance(m as i64));
            }
            for &m in &other_year_months {
                timeline.insert(ym(2022, m), balance(1000 + m as i64));
            }

            let expected = timeline
                .iter()
                .filter(|(p, _)| p.is_last_year_of(status))
                .map(|(p, _)| p)
                .max()
                .unwrap();
            let entry = timeline.end_of_last_year(status);
            prop_assert_eq!(entry.period, expected);
            prop_assert_eq!(entry.values.balance, Decimal::from(*months.iter().max().unwrap() as i64));
        }

        /// Posting preserves the one-entry-per-period invariant and the
        /// timeline's chronological order.
        #[test]
        fn posting_keeps_periods_unique(
            posts in prop::collection::vec((1u32..=12, -500i64..500), 1..32),
        ) {
            let mut timeline: Timeline<BalanceValues> = Timeline::new();
            for (month, amount) in &posts {
                timeline.post(ym(2024, *month), Decimal::from(*amount));
            }
            let periods: Vec<_> = timeline.iter().map(|(p, _)| p).collect();
            let mut sorted = periods.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(periods, sorted);
        }
    }
}
