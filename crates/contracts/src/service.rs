//! Request-scoped application service for the accounting subsystem.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use ledgerdesk_accounting::{
    AccountGroupStatus, AccountingNumber, AccountingRepository, BudgetAccountGroupStatus,
    LedgerRefs, PostingPolicy, account_group_statuses, budget_account_group_statuses,
};

use crate::convert;
use crate::errors::ServiceError;
use crate::models::{ApplyPostingJournalModel, ApplyPostingJournalResultModel};

/// Facade the Web API host calls.
///
/// Request-scoped: each call fetches its own ledger set from the injected
/// repository and returns the result; nothing is persisted here and no
/// state is shared across calls. Callers serialize journals that touch
/// the same accounts.
#[derive(Debug)]
pub struct PostingService<R> {
    repository: R,
    policy: PostingPolicy,
}

impl<R: AccountingRepository> PostingService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_policy(repository, PostingPolicy::default())
    }

    pub fn with_policy(repository: R, policy: PostingPolicy) -> Self {
        Self { repository, policy }
    }

    /// Apply a posting journal: convert, fetch, validate, apply.
    ///
    /// Returns the applied lines and the full warning list together, or
    /// the rejection covering every failed line. `now` anchors the
    /// future-dating check.
    pub async fn apply_posting_journal(
        &self,
        model: &ApplyPostingJournalModel,
        now: DateTime<Utc>,
    ) -> Result<ApplyPostingJournalResultModel, ServiceError> {
        let journal = convert::journal_from_model(model)?;
        let refs = LedgerRefs::of_journal(&journal);
        let mut ledgers = self
            .repository
            .fetch_ledgers(journal.accounting_number, &refs)
            .await?;

        let validated = journal.validate(&ledgers, &self.policy, now)?;
        let result = validated.apply(&mut ledgers)?;
        info!(
            accounting = model.accounting_number,
            lines = result.lines.len(),
            warnings = result.warnings.len(),
            "posting journal accepted"
        );
        Ok(convert::result_to_model(&result))
    }

    /// Account-group rollups for one accounting at a status date.
    pub async fn account_group_statuses(
        &self,
        accounting_number: i32,
        status_date: NaiveDate,
    ) -> Result<Vec<AccountGroupStatus>, ServiceError> {
        let accounting_number = AccountingNumber::new(accounting_number)?;
        let ledgers = self.repository.fetch_accounting(accounting_number).await?;
        Ok(account_group_statuses(&ledgers, status_date))
    }

    /// Budget-account-group rollups for one accounting at a status date.
    pub async fn budget_account_group_statuses(
        &self,
        accounting_number: i32,
        status_date: NaiveDate,
    ) -> Result<Vec<BudgetAccountGroupStatus>, ServiceError> {
        let accounting_number = AccountingNumber::new(accounting_number)?;
        let ledgers = self.repository.fetch_accounting(accounting_number).await?;
        Ok(budget_account_group_statuses(&ledgers, status_date))
    }
}
