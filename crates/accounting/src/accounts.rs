//! Account ledgers and the resolved set a journal runs against.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ledgerdesk_core::{DomainError, DomainResult};

use crate::period::YearMonth;
use crate::timeline::{Timeline, TimelineSnapshot};
use crate::values::{BalanceValues, BudgetValues, CreditValues, PeriodValues};

static ACCOUNT_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Z][0-9A-Z+\-]{0,15}$").expect("account number pattern"));

/// Number identifying one account within an accounting.
///
/// 1-16 characters, digits and uppercase letters (plus `+`/`-` after the
/// first); lowercase input is uppercased on parse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: impl AsRef<str>) -> DomainResult<Self> {
        let value = value.as_ref().trim().to_uppercase();
        if ACCOUNT_NUMBER_PATTERN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "'{value}' is not a valid account number"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number identifying one accounting (ledger set) in the suite, 1-99.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountingNumber(i32);

impl AccountingNumber {
    pub fn new(value: i32) -> DomainResult<Self> {
        if (1..=99).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "accounting number {value} is outside the range 1-99"
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AccountingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Categorical group for credit-bearing accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    pub number: u32,
    pub name: String,
}

/// Whether a budget-account group tracks expected income or expected
/// expenses; drives which financial warning applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    Income,
    Expense,
}

/// Categorical group for budget accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAccountGroup {
    pub number: u32,
    pub name: String,
    pub category: BudgetCategory,
}

/// Common surface of the three ledger kinds: identity plus the owned
/// timeline the temporal queries run over.
pub trait Ledger {
    type Values: PeriodValues;

    fn number(&self) -> &AccountNumber;
    fn name(&self) -> &str;
    fn timeline(&self) -> &Timeline<Self::Values>;

    /// Read-through snapshot of the owned timeline.
    fn status_at(&self, status_date: NaiveDate) -> TimelineSnapshot<Self::Values> {
        self.timeline().snapshot(YearMonth::from_date(status_date))
    }
}

/// A credit-bearing account: one credit timeline plus group membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    number: AccountNumber,
    name: String,
    group: AccountGroup,
    timeline: Timeline<CreditValues>,
}

impl Account {
    pub fn new(number: AccountNumber, name: impl Into<String>, group: AccountGroup) -> Self {
        Self {
            number,
            name: name.into(),
            group,
            timeline: Timeline::new(),
        }
    }

    pub fn group(&self) -> &AccountGroup {
        &self.group
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline<CreditValues> {
        &mut self.timeline
    }
}

impl Ledger for Account {
    type Values = CreditValues;

    fn number(&self) -> &AccountNumber {
        &self.number
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn timeline(&self) -> &Timeline<CreditValues> {
        &self.timeline
    }
}

/// A budget account: per-period expected figures plus recorded postings.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAccount {
    number: AccountNumber,
    name: String,
    group: BudgetAccountGroup,
    timeline: Timeline<BudgetValues>,
}

impl BudgetAccount {
    pub fn new(
        number: AccountNumber,
        name: impl Into<String>,
        group: BudgetAccountGroup,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            group,
            timeline: Timeline::new(),
        }
    }

    pub fn group(&self) -> &BudgetAccountGroup {
        &self.group
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline<BudgetValues> {
        &mut self.timeline
    }

    /// Budget figures for the status date's month alone.
    pub fn month_at(&self, status_date: NaiveDate) -> BudgetValues {
        self.timeline.month_of(YearMonth::from_date(status_date))
    }

    /// Budget figures accumulated from January through the status month.
    pub fn year_to_date_at(&self, status_date: NaiveDate) -> BudgetValues {
        self.timeline.year_to_date(YearMonth::from_date(status_date))
    }
}

impl Ledger for BudgetAccount {
    type Values = BudgetValues;

    fn number(&self) -> &AccountNumber {
        &self.number
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn timeline(&self) -> &Timeline<BudgetValues> {
        &self.timeline
    }
}

/// A contact (payable/receivable) account: balance timeline only.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactAccount {
    number: AccountNumber,
    name: String,
    timeline: Timeline<BalanceValues>,
}

impl ContactAccount {
    pub fn new(number: AccountNumber, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            timeline: Timeline::new(),
        }
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline<BalanceValues> {
        &mut self.timeline
    }
}

impl Ledger for ContactAccount {
    type Values = BalanceValues;

    fn number(&self) -> &AccountNumber {
        &self.number
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn timeline(&self) -> &Timeline<BalanceValues> {
        &self.timeline
    }
}

/// The pre-resolved ledgers one journal application runs against.
///
/// Exclusively owned for the duration of the call: journals touching the
/// same accounts must be serialized by the caller, and the repository
/// hands out an independent set per request.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSet {
    accounting_number: AccountingNumber,
    accounts: BTreeMap<AccountNumber, Account>,
    budget_accounts: BTreeMap<AccountNumber, BudgetAccount>,
    contact_accounts: BTreeMap<AccountNumber, ContactAccount>,
}

impl LedgerSet {
    pub fn new(accounting_number: AccountingNumber) -> Self {
        Self {
            accounting_number,
            accounts: BTreeMap::new(),
            budget_accounts: BTreeMap::new(),
            contact_accounts: BTreeMap::new(),
        }
    }

    pub fn accounting_number(&self) -> AccountingNumber {
        self.accounting_number
    }

    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.number().clone(), account);
    }

    pub fn insert_budget_account(&mut self, account: BudgetAccount) {
        self.budget_accounts.insert(account.number().clone(), account);
    }

    pub fn insert_contact_account(&mut self, account: ContactAccount) {
        self.contact_accounts
            .insert(account.number().clone(), account);
    }

    pub fn account(&self, number: &AccountNumber) -> Option<&Account> {
        self.accounts.get(number)
    }

    pub fn account_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    pub fn budget_account(&self, number: &AccountNumber) -> Option<&BudgetAccount> {
        self.budget_accounts.get(number)
    }

    pub fn budget_account_mut(&mut self, number: &AccountNumber) -> Option<&mut BudgetAccount> {
        self.budget_accounts.get_mut(number)
    }

    pub fn contact_account(&self, number: &AccountNumber) -> Option<&ContactAccount> {
        self.contact_accounts.get(number)
    }

    pub fn contact_account_mut(&mut self, number: &AccountNumber) -> Option<&mut ContactAccount> {
        self.contact_accounts.get_mut(number)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn budget_accounts(&self) -> impl Iterator<Item = &BudgetAccount> {
        self.budget_accounts.values()
    }

    pub fn contact_accounts(&self) -> impl Iterator<Item = &ContactAccount> {
        self.contact_accounts.values()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn account_numbers_are_normalized_and_validated() {
        assert_eq!(AccountNumber::new("  1010 ").unwrap().as_str(), "1010");
        assert_eq!(AccountNumber::new("cash-01").unwrap().as_str(), "CASH-01");
        assert!(AccountNumber::new("").is_err());
        assert!(AccountNumber::new("-LEADING").is_err());
        assert!(AccountNumber::new("WAY-TOO-LONG-ACCOUNT-NUMBER").is_err());
        assert!(AccountNumber::new("NO SPACES").is_err());
    }

    #[test]
    fn accounting_numbers_are_bounded() {
        assert!(AccountingNumber::new(0).is_err());
        assert!(AccountingNumber::new(100).is_err());
        assert_eq!(AccountingNumber::new(1).unwrap().get(), 1);
        assert_eq!(AccountingNumber::new(99).unwrap().get(), 99);
    }

    #[test]
    fn ledger_status_reads_through_to_timeline() {
        let group = AccountGroup {
            number: 1,
            name: "Current assets".to_string(),
        };
        let mut account = Account::new(AccountNumber::new("1010").unwrap(), "Bank", group);
        account.timeline_mut().insert(
            YearMonth::new(2024, 3).unwrap(),
            CreditValues::new(Decimal::from(500), Decimal::from(120)),
        );

        let status = account.status_at(chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(status.at_status_date.values.balance, Decimal::from(120));
        assert_eq!(status.at_status_date.values.available(), Decimal::from(380));
    }
}
