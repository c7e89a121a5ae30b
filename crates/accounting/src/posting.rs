//! Posting-journal validation, application and financial warnings.
//!
//! A journal moves through two phases, mirroring the decide/mutate split
//! used across the suite's domain crates: [`PostingJournal::validate`] is
//! a pure decision over the resolved ledgers and rejects the whole batch
//! if any line fails; [`ValidatedJournal::apply`] mutates the ledger set
//! and cannot fail. The mutation section never suspends, so a cancelled
//! (dropped) call can never leave a journal half-applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use ledgerdesk_core::{DomainError, DomainResult, PostingLineId};

use crate::accounts::{AccountNumber, AccountingNumber, BudgetCategory, Ledger, LedgerSet};
use crate::period::YearMonth;
use crate::policy::PostingPolicy;
use crate::values::{BalanceValues, BudgetValues, CreditValues};

/// Largest debit/credit amount a single line may carry.
pub fn max_posting_amount() -> Decimal {
    Decimal::from(99_999_999)
}

/// Largest sort order a line may carry.
pub const MAX_SORT_ORDER: u32 = 9_999_999;

const MAX_DETAILS_CHARS: usize = 256;
const MAX_REFERENCE_CHARS: usize = 16;

/// One debit/credit movement to apply to an account, optionally annotated
/// with a budget account (memo leg) and a contact account (balancing leg).
#[derive(Debug, Clone, PartialEq)]
pub struct PostingLine {
    /// Assigned by the engine when absent.
    pub identifier: Option<PostingLineId>,
    pub posting_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub account_number: AccountNumber,
    pub details: String,
    pub budget_account_number: Option<AccountNumber>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub contact_account_number: Option<AccountNumber>,
    /// Assigned after the highest explicit sort order when absent.
    pub sort_order: Option<u32>,
}

/// A batch of posting lines for one accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingJournal {
    pub accounting_number: AccountingNumber,
    pub lines: Vec<PostingLine>,
}

/// Why one posting line failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostingLineFailure {
    #[error("exactly one of debit and credit must be set")]
    AmountMissing,
    #[error("debit and credit cannot both be set")]
    AmountAmbiguous,
    #[error("posting amount must be strictly positive, got {amount}")]
    AmountNotPositive { amount: Decimal },
    #[error("posting amount {amount} exceeds the supported maximum")]
    AmountOutOfRange { amount: Decimal },
    #[error("'{value}' is not a valid account number")]
    InvalidAccountNumber { value: String },
    #[error("'{value}' is not a valid budget account number")]
    InvalidBudgetAccountNumber { value: String },
    #[error("'{value}' is not a valid contact account number")]
    InvalidContactAccountNumber { value: String },
    #[error("unknown account '{number}'")]
    UnknownAccount { number: AccountNumber },
    #[error("unknown budget account '{number}'")]
    UnknownBudgetAccount { number: AccountNumber },
    #[error("unknown contact account '{number}'")]
    UnknownContactAccount { number: AccountNumber },
    #[error("posting date {posting_date} is in the future")]
    FutureDated { posting_date: DateTime<Utc> },
    #[error("posting date {posting_date} is outside the supported year range")]
    PostingDateOutOfRange { posting_date: DateTime<Utc> },
    #[error("details must be 1 to 256 characters")]
    DetailsInvalid,
    #[error("reference must be at most 16 characters")]
    ReferenceTooLong,
    #[error("sort order {sort_order} exceeds the supported maximum")]
    SortOrderOutOfRange { sort_order: u32 },
}

/// A line that failed validation, with its position in the journal and
/// every failure found on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line_index: usize,
    pub failures: Vec<PostingLineFailure>,
}

/// The whole journal was rejected; nothing was applied.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("posting journal rejected: {} of {line_count} line(s) failed validation", .rejected.len())]
pub struct JournalRejection {
    pub line_count: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Reasons a financial warning is attached to an applied journal.
///
/// Serialized names are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingWarningReason {
    AccountIsOverdrawn,
    ExpectedIncomeHasNotBeenReachedYet,
    ExpectedExpensesHaveAlreadyBeenReached,
}

/// Identity of the account a warning or applied line points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentification {
    pub number: AccountNumber,
    pub name: String,
}

/// A non-fatal financial warning raised while applying a journal.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingWarning {
    pub reason: PostingWarningReason,
    pub account: AccountIdentification,
    /// The signed amount that triggered the warning: available room for
    /// overdrafts, posted-minus-budget for the budget warnings.
    pub amount: Decimal,
    pub line: AppliedPostingLine,
}

/// A validated, applied posting line plus the ledger values it produced
/// at its posting period.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPostingLine {
    pub identifier: PostingLineId,
    pub posting_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub account: AccountIdentification,
    pub account_values: CreditValues,
    pub details: String,
    pub budget_account: Option<AccountIdentification>,
    pub budget_account_values: Option<BudgetValues>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub contact_account: Option<AccountIdentification>,
    pub contact_account_values: Option<BalanceValues>,
    pub sort_order: u32,
}

/// Output of one journal application: the applied lines in application
/// order and every warning raised, in the order the triggering lines
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingJournalResult {
    pub lines: Vec<AppliedPostingLine>,
    pub warnings: Vec<PostingWarning>,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidatedLine {
    identifier: PostingLineId,
    posting_date: DateTime<Utc>,
    period: YearMonth,
    reference: Option<String>,
    account_number: AccountNumber,
    details: String,
    budget_account_number: Option<AccountNumber>,
    debit: Option<Decimal>,
    credit: Option<Decimal>,
    contact_account_number: Option<AccountNumber>,
    sort_order: u32,
}

/// A journal that passed validation against a ledger set.
///
/// Holds the policy it was validated under; applying cannot fail (beyond
/// the caller handing it a different ledger set than it was validated
/// against, which is an invariant violation).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedJournal {
    accounting_number: AccountingNumber,
    lines: Vec<ValidatedLine>,
    policy: PostingPolicy,
}

impl PostingJournal {
    /// Validate every line against the resolved ledgers.
    ///
    /// All-or-nothing: a single failing line rejects the whole journal,
    /// and every failure on every line is reported together. No ledger
    /// is touched here.
    pub fn validate(
        &self,
        ledgers: &LedgerSet,
        policy: &PostingPolicy,
        now: DateTime<Utc>,
    ) -> Result<ValidatedJournal, JournalRejection> {
        let mut rejected: Vec<RejectedLine> = Vec::new();
        let mut valid: Vec<(usize, &PostingLine, YearMonth)> = Vec::new();

        for (line_index, line) in self.lines.iter().enumerate() {
            let mut failures = Vec::new();

            match (line.debit, line.credit) {
                (None, None) => failures.push(PostingLineFailure::AmountMissing),
                (Some(_), Some(_)) => failures.push(PostingLineFailure::AmountAmbiguous),
                (Some(amount), None) | (None, Some(amount)) => {
                    if amount <= Decimal::ZERO {
                        failures.push(PostingLineFailure::AmountNotPositive { amount });
                    } else if amount > max_posting_amount() {
                        failures.push(PostingLineFailure::AmountOutOfRange { amount });
                    }
                }
            }

            let details_chars = line.details.chars().count();
            if details_chars == 0 || details_chars > MAX_DETAILS_CHARS {
                failures.push(PostingLineFailure::DetailsInvalid);
            }
            if let Some(reference) = &line.reference
                && reference.chars().count() > MAX_REFERENCE_CHARS
            {
                failures.push(PostingLineFailure::ReferenceTooLong);
            }

            let period = YearMonth::from_date(line.posting_date.date_naive());
            if !period.is_supported() {
                failures.push(PostingLineFailure::PostingDateOutOfRange {
                    posting_date: line.posting_date,
                });
            }
            if !policy.allow_future_dating
                && line.posting_date.date_naive() > now.date_naive()
            {
                failures.push(PostingLineFailure::FutureDated {
                    posting_date: line.posting_date,
                });
            }

            if ledgers.account(&line.account_number).is_none() {
                failures.push(PostingLineFailure::UnknownAccount {
                    number: line.account_number.clone(),
                });
            }
            if let Some(number) = &line.budget_account_number
                && ledgers.budget_account(number).is_none()
            {
                failures.push(PostingLineFailure::UnknownBudgetAccount {
                    number: number.clone(),
                });
            }
            if let Some(number) = &line.contact_account_number
                && ledgers.contact_account(number).is_none()
            {
                failures.push(PostingLineFailure::UnknownContactAccount {
                    number: number.clone(),
                });
            }

            if let Some(sort_order) = line.sort_order
                && sort_order > MAX_SORT_ORDER
            {
                failures.push(PostingLineFailure::SortOrderOutOfRange { sort_order });
            }

            if failures.is_empty() {
                valid.push((line_index, line, period));
            } else {
                rejected.push(RejectedLine {
                    line_index,
                    failures,
                });
            }
        }

        if !rejected.is_empty() {
            debug!(
                accounting = self.accounting_number.get(),
                rejected = rejected.len(),
                lines = self.lines.len(),
                "posting journal rejected"
            );
            return Err(JournalRejection {
                line_count: self.lines.len(),
                rejected,
            });
        }

        // Assign missing sort orders after the highest explicit one,
        // preserving input order, then order stably for application.
        let mut next_sort_order = self
            .lines
            .iter()
            .filter_map(|line| line.sort_order)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);
        let mut lines: Vec<ValidatedLine> = valid
            .into_iter()
            .map(|(_, line, period)| {
                let sort_order = line.sort_order.unwrap_or_else(|| {
                    let assigned = next_sort_order;
                    next_sort_order += 1;
                    assigned
                });
                ValidatedLine {
                    identifier: line.identifier.unwrap_or_default(),
                    posting_date: line.posting_date,
                    period,
                    reference: line.reference.clone(),
                    account_number: line.account_number.clone(),
                    details: line.details.clone(),
                    budget_account_number: line.budget_account_number.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    contact_account_number: line.contact_account_number.clone(),
                    sort_order,
                }
            })
            .collect();
        lines.sort_by_key(|line| line.sort_order);

        Ok(ValidatedJournal {
            accounting_number: self.accounting_number,
            lines,
            policy: policy.clone(),
        })
    }
}

impl ValidatedJournal {
    pub fn accounting_number(&self) -> AccountingNumber {
        self.accounting_number
    }

    /// Apply every line, in sort order, to the ledger set the journal was
    /// validated against.
    ///
    /// Errors only when handed a set that does not contain the validated
    /// accounts (caller bug); it never fails on ledger arithmetic, and it
    /// never suspends, so there is no partially-applied state to observe.
    pub fn apply(self, ledgers: &mut LedgerSet) -> DomainResult<PostingJournalResult> {
        if ledgers.accounting_number() != self.accounting_number {
            return Err(DomainError::invariant(format!(
                "journal for accounting {} applied to ledgers of accounting {}",
                self.accounting_number,
                ledgers.accounting_number()
            )));
        }

        let mut applied = Vec::with_capacity(self.lines.len());
        let mut warnings = Vec::new();

        for line in &self.lines {
            let amount = line.debit.unwrap_or_default() - line.credit.unwrap_or_default();

            let account = ledgers.account_mut(&line.account_number).ok_or_else(|| {
                DomainError::invariant(format!(
                    "validated account '{}' missing from ledger set",
                    line.account_number
                ))
            })?;
            account.timeline_mut().post(line.period, amount);
            let account_values = account.timeline().month_of(line.period);
            let account_identification = AccountIdentification {
                number: account.number().clone(),
                name: account.name().to_string(),
            };

            let mut budget_account = None;
            let mut budget_account_values = None;
            if let Some(number) = &line.budget_account_number {
                let budget = ledgers.budget_account_mut(number).ok_or_else(|| {
                    DomainError::invariant(format!(
                        "validated budget account '{number}' missing from ledger set"
                    ))
                })?;
                budget.timeline_mut().post(line.period, amount);
                budget_account_values = Some(budget.timeline().month_of(line.period));
                budget_account = Some(AccountIdentification {
                    number: budget.number().clone(),
                    name: budget.name().to_string(),
                });
            }

            let mut contact_account = None;
            let mut contact_account_values = None;
            if let Some(number) = &line.contact_account_number {
                let contact = ledgers.contact_account_mut(number).ok_or_else(|| {
                    DomainError::invariant(format!(
                        "validated contact account '{number}' missing from ledger set"
                    ))
                })?;
                // The balancing leg: a debit on the account is a credit on
                // the contact, and vice versa.
                contact.timeline_mut().post(line.period, -amount);
                contact_account_values = Some(contact.timeline().month_of(line.period));
                contact_account = Some(AccountIdentification {
                    number: contact.number().clone(),
                    name: contact.name().to_string(),
                });
            }

            let applied_line = AppliedPostingLine {
                identifier: line.identifier,
                posting_date: line.posting_date,
                reference: line.reference.clone(),
                account: account_identification,
                account_values,
                details: line.details.clone(),
                budget_account,
                budget_account_values,
                debit: line.debit,
                credit: line.credit,
                contact_account,
                contact_account_values,
                sort_order: line.sort_order,
            };

            self.collect_warnings(ledgers, &applied_line, line.period, &mut warnings);
            applied.push(applied_line);
        }

        info!(
            accounting = self.accounting_number.get(),
            lines = applied.len(),
            warnings = warnings.len(),
            "posting journal applied"
        );

        Ok(PostingJournalResult {
            lines: applied,
            warnings,
        })
    }

    /// Warnings for one applied line, evaluated at the line's posting
    /// period. Non-blocking: posting has already succeeded.
    fn collect_warnings(
        &self,
        ledgers: &LedgerSet,
        applied_line: &AppliedPostingLine,
        period: YearMonth,
        warnings: &mut Vec<PostingWarning>,
    ) {
        let available = applied_line.account_values.available();
        if available < Decimal::ZERO {
            warnings.push(PostingWarning {
                reason: PostingWarningReason::AccountIsOverdrawn,
                account: applied_line.account.clone(),
                amount: available,
                line: applied_line.clone(),
            });
        }

        let Some(identification) = &applied_line.budget_account else {
            return;
        };
        let Some(budget_account) = ledgers.budget_account(&identification.number) else {
            return;
        };
        let year_to_date = budget_account.timeline().year_to_date(period);
        let shortfall = year_to_date.posted - year_to_date.budget();
        match budget_account.group().category {
            BudgetCategory::Income => {
                if period.month() > self.policy.income_shortfall_grace_months
                    && shortfall < -self.policy.income_shortfall_threshold
                {
                    warnings.push(PostingWarning {
                        reason: PostingWarningReason::ExpectedIncomeHasNotBeenReachedYet,
                        account: identification.clone(),
                        amount: shortfall,
                        line: applied_line.clone(),
                    });
                }
            }
            BudgetCategory::Expense => {
                let posted = year_to_date.posted;
                let budget = year_to_date.budget();
                if posted <= budget && !(posted.is_zero() && budget.is_zero()) {
                    warnings.push(PostingWarning {
                        reason: PostingWarningReason::ExpectedExpensesHaveAlreadyBeenReached,
                        account: identification.clone(),
                        amount: shortfall,
                        line: applied_line.clone(),
                    });
                }
            }
        }
    }
}
