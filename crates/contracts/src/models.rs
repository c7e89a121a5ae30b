//! Wire models exchanged with the Web API host.
//!
//! Field names and value ranges are bit-exact parts of the contract;
//! optional fields are omitted from JSON when absent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use ledgerdesk_accounting::PostingWarningReason;

/// Request: apply a posting journal to one accounting (1-99).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPostingJournalModel {
    pub accounting_number: i32,
    pub apply_posting_lines: Vec<ApplyPostingLineModel>,
}

/// Request: one posting line to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPostingLineModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Uuid>,
    pub posting_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub account_number: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
}

/// Response: the applied lines plus every financial warning raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPostingJournalResultModel {
    pub posting_lines: Vec<PostingLineModel>,
    pub posting_warnings: Vec<PostingWarningModel>,
}

/// One applied posting line with the ledger values at its posting date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingLineModel {
    pub identifier: Uuid,
    pub posting_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub account: AccountIdentificationModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_values_at_posting_date: Option<CreditInfoValuesModel>,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_account: Option<AccountIdentificationModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_account_values_at_posting_date: Option<BudgetInfoValuesModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_account: Option<AccountIdentificationModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_account_values_at_posting_date: Option<BalanceInfoValuesModel>,
    pub sort_order: u32,
}

/// A financial warning attached to a successful journal application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingWarningModel {
    pub reason: PostingWarningReason,
    pub account: AccountIdentificationModel,
    pub amount: Decimal,
    pub posting_line: PostingLineModel,
}

/// Minimal identification of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdentificationModel {
    pub account_number: String,
    pub account_name: String,
}

/// Credit-account values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditInfoValuesModel {
    pub balance: Decimal,
    pub credit: Decimal,
    pub available: Decimal,
}

/// Budget-account values for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInfoValuesModel {
    pub budget: Decimal,
    pub posted: Decimal,
    pub available: Decimal,
}

/// Contact-account values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInfoValuesModel {
    pub balance: Decimal,
}

/// Structured error payload the host returns on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorModel {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_lines: Vec<RejectedPostingLineModel>,
}

/// One rejected line with every validation message found on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPostingLineModel {
    pub line_index: u32,
    pub messages: Vec<String>,
}
