//! Ledger store seam.
//!
//! Fetching ledgers is the only genuine I/O in the posting pipeline; the
//! engine itself runs on a pre-fetched [`LedgerSet`], which keeps the core
//! testable without a database.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use ledgerdesk_core::{DomainError, DomainResult};

use crate::accounts::{AccountNumber, AccountingNumber, LedgerSet};
use crate::posting::PostingJournal;

/// The account references one journal names, used to pre-fetch exactly
/// the ledgers it touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerRefs {
    pub accounts: BTreeSet<AccountNumber>,
    pub budget_accounts: BTreeSet<AccountNumber>,
    pub contact_accounts: BTreeSet<AccountNumber>,
}

impl LedgerRefs {
    pub fn of_journal(journal: &PostingJournal) -> Self {
        let mut refs = Self::default();
        for line in &journal.lines {
            refs.accounts.insert(line.account_number.clone());
            if let Some(number) = &line.budget_account_number {
                refs.budget_accounts.insert(number.clone());
            }
            if let Some(number) = &line.contact_account_number {
                refs.contact_accounts.insert(number.clone());
            }
        }
        refs
    }
}

/// Ledger store the engine reads from.
///
/// Implementations fetch state; they never apply journals. A fetched
/// [`LedgerSet`] contains the referenced ledgers that exist — missing
/// references surface later as validation failures, not repository
/// errors. An unknown accounting number is a repository error.
#[async_trait]
pub trait AccountingRepository: Send + Sync {
    /// Fetch the ledgers named by `refs` for one accounting.
    async fn fetch_ledgers(
        &self,
        accounting_number: AccountingNumber,
        refs: &LedgerRefs,
    ) -> DomainResult<LedgerSet>;

    /// Fetch every ledger of one accounting (status/report queries).
    async fn fetch_accounting(&self, accounting_number: AccountingNumber)
    -> DomainResult<LedgerSet>;
}

/// In-memory ledger store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountingRepository {
    accountings: Mutex<BTreeMap<AccountingNumber, LedgerSet>>,
}

impl InMemoryAccountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or replace) one accounting's ledgers.
    pub fn insert_accounting(&self, set: LedgerSet) -> DomainResult<()> {
        let mut accountings = self.lock()?;
        accountings.insert(set.accounting_number(), set);
        Ok(())
    }

    fn lock(&self) -> DomainResult<std::sync::MutexGuard<'_, BTreeMap<AccountingNumber, LedgerSet>>> {
        self.accountings
            .lock()
            .map_err(|_| DomainError::invariant("ledger store lock poisoned"))
    }
}

#[async_trait]
impl AccountingRepository for InMemoryAccountingRepository {
    async fn fetch_ledgers(
        &self,
        accounting_number: AccountingNumber,
        refs: &LedgerRefs,
    ) -> DomainResult<LedgerSet> {
        let accountings = self.lock()?;
        let stored = accountings
            .get(&accounting_number)
            .ok_or_else(|| DomainError::not_found(format!("accounting {accounting_number}")))?;

        let mut set = LedgerSet::new(accounting_number);
        for number in &refs.accounts {
            if let Some(account) = stored.account(number) {
                set.insert_account(account.clone());
            }
        }
        for number in &refs.budget_accounts {
            if let Some(account) = stored.budget_account(number) {
                set.insert_budget_account(account.clone());
            }
        }
        for number in &refs.contact_accounts {
            if let Some(account) = stored.contact_account(number) {
                set.insert_contact_account(account.clone());
            }
        }
        Ok(set)
    }

    async fn fetch_accounting(
        &self,
        accounting_number: AccountingNumber,
    ) -> DomainResult<LedgerSet> {
        let accountings = self.lock()?;
        accountings
            .get(&accounting_number)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("accounting {accounting_number}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::accounts::{Account, AccountGroup, ContactAccount};
    use crate::posting::PostingLine;

    fn number(value: &str) -> AccountNumber {
        AccountNumber::new(value).unwrap()
    }

    fn seeded() -> InMemoryAccountingRepository {
        let repository = InMemoryAccountingRepository::new();
        let mut set = LedgerSet::new(AccountingNumber::new(1).unwrap());
        set.insert_account(Account::new(
            number("1010"),
            "Bank",
            AccountGroup {
                number: 1,
                name: "Liquid".to_string(),
            },
        ));
        set.insert_contact_account(ContactAccount::new(number("C-100"), "Plumber Ltd"));
        repository.insert_accounting(set).unwrap();
        repository
    }

    fn journal_touching(account: &str, contact: Option<&str>) -> PostingJournal {
        PostingJournal {
            accounting_number: AccountingNumber::new(1).unwrap(),
            lines: vec![PostingLine {
                identifier: None,
                posting_date: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
                reference: None,
                account_number: number(account),
                details: "Posting".to_string(),
                budget_account_number: None,
                debit: Some(Decimal::from(10)),
                credit: None,
                contact_account_number: contact.map(number),
                sort_order: None,
            }],
        }
    }

    #[tokio::test]
    async fn fetch_returns_only_referenced_ledgers_that_exist() {
        let repository = seeded();
        let journal = journal_touching("1010", Some("C-100"));
        let refs = LedgerRefs::of_journal(&journal);

        let set = repository
            .fetch_ledgers(AccountingNumber::new(1).unwrap(), &refs)
            .await
            .unwrap();
        assert!(set.account(&number("1010")).is_some());
        assert!(set.contact_account(&number("C-100")).is_some());

        // Unknown references come back absent, to fail validation later.
        let journal = journal_touching("9999", None);
        let refs = LedgerRefs::of_journal(&journal);
        let set = repository
            .fetch_ledgers(AccountingNumber::new(1).unwrap(), &refs)
            .await
            .unwrap();
        assert!(set.account(&number("9999")).is_none());
    }

    #[tokio::test]
    async fn unknown_accounting_is_not_found() {
        let repository = seeded();
        let err = repository
            .fetch_accounting(AccountingNumber::new(42).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
