//! Tunables for posting-journal validation and warning generation.

use rust_decimal::Decimal;

/// Posting policy for one applier invocation.
///
/// Plain data, injected per call site; there is no process-wide policy
/// singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPolicy {
    /// Accept posting dates after "now". Off by default: back-office
    /// journals record what already happened.
    pub allow_future_dating: bool,
    /// Months at the start of the budget year during which an income
    /// shortfall is not yet meaningful (collection lags billing early in
    /// the year).
    pub income_shortfall_grace_months: u32,
    /// Year-to-date income must fall short of budget by more than this
    /// before a warning is raised.
    pub income_shortfall_threshold: Decimal,
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self {
            allow_future_dating: false,
            income_shortfall_grace_months: 2,
            income_shortfall_threshold: Decimal::ZERO,
        }
    }
}
