//! Accounting ledger engine: temporal balance aggregation and
//! posting-journal application.
//!
//! Pure domain logic plus the repository seam; no HTTP, no persistence
//! concerns. Callers hand the engine a resolved [`LedgerSet`] and get
//! back applied lines and financial warnings; what to persist is their
//! decision.

pub mod accounts;
pub mod group_status;
pub mod period;
pub mod policy;
pub mod posting;
pub mod repository;
pub mod timeline;
pub mod values;

pub use accounts::{
    Account, AccountGroup, AccountNumber, AccountingNumber, BudgetAccount, BudgetAccountGroup,
    BudgetCategory, ContactAccount, Ledger, LedgerSet,
};
pub use group_status::{
    AccountGroupStatus, BudgetAccountGroupStatus, GroupStatus, account_group_statuses,
    budget_account_group_statuses,
};
pub use period::YearMonth;
pub use policy::PostingPolicy;
pub use posting::{
    AccountIdentification, AppliedPostingLine, JournalRejection, PostingJournal,
    PostingJournalResult, PostingLine, PostingLineFailure, PostingWarning, PostingWarningReason,
    RejectedLine, ValidatedJournal,
};
pub use repository::{AccountingRepository, InMemoryAccountingRepository, LedgerRefs};
pub use timeline::{PeriodEntry, Timeline, TimelineSnapshot};
pub use values::{BalanceValues, BudgetValues, CreditValues, PeriodValues};
