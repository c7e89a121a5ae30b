//! Calendar periods for ledger figures.

use core::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{DomainError, DomainResult};

/// Earliest year the ledger accepts figures for.
pub const MIN_YEAR: i32 = 1950;
/// Latest year the ledger accepts figures for.
pub const MAX_YEAR: i32 = 2199;

/// One (year, month) bucket.
///
/// Ordering is chronological: the derived lexicographic order on
/// (year, month) is exactly calendar order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Validated constructor for externally supplied periods.
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DomainError::validation(format!(
                "year {year} is outside the supported range {MIN_YEAR}-{MAX_YEAR}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month {month} is outside the range 1-12"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whether a figure stored under this period is within the supported
    /// year range.
    pub fn is_supported(self) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&self.year)
    }

    /// Same year and month as the status date's period.
    pub fn is_month_of(self, status: YearMonth) -> bool {
        self == status
    }

    /// The calendar month immediately preceding the status date's month.
    pub fn is_last_month_of(self, status: YearMonth) -> bool {
        self == status.pred()
    }

    /// Any month of the year before the status date's year.
    pub fn is_last_year_of(self, status: YearMonth) -> bool {
        self.year == status.year - 1
    }

    pub(crate) fn start_of_year(self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }

    pub(crate) fn raw(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
