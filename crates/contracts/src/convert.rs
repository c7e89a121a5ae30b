//! Conversions between wire models and the accounting domain.

use ledgerdesk_accounting::{
    AccountIdentification, AccountNumber, AccountingNumber, AppliedPostingLine, BalanceValues,
    BudgetValues, CreditValues, JournalRejection, PostingJournal, PostingJournalResult,
    PostingLine, PostingLineFailure, PostingWarning, RejectedLine,
};

use crate::errors::ServiceError;
use crate::models::{
    AccountIdentificationModel, ApplyPostingJournalModel, ApplyPostingJournalResultModel,
    ApplyPostingLineModel, BalanceInfoValuesModel, BudgetInfoValuesModel, CreditInfoValuesModel,
    PostingLineModel, PostingWarningModel,
};

/// Build a domain journal from the wire request.
///
/// Malformed account numbers reject the journal the same way engine
/// validation does: all-or-nothing, every failing line reported. Empty
/// optional strings count as absent.
pub fn journal_from_model(model: &ApplyPostingJournalModel) -> Result<PostingJournal, ServiceError> {
    let accounting_number = AccountingNumber::new(model.accounting_number)?;

    let mut rejected: Vec<RejectedLine> = Vec::new();
    let mut lines: Vec<PostingLine> = Vec::with_capacity(model.apply_posting_lines.len());

    for (line_index, line) in model.apply_posting_lines.iter().enumerate() {
        let mut failures: Vec<PostingLineFailure> = Vec::new();

        let account_number = match AccountNumber::new(&line.account_number) {
            Ok(number) => Some(number),
            Err(_) => {
                failures.push(PostingLineFailure::InvalidAccountNumber {
                    value: line.account_number.clone(),
                });
                None
            }
        };
        let budget_account_number =
            match non_empty(line.budget_account_number.as_deref()).map(AccountNumber::new) {
                None => None,
                Some(Ok(number)) => Some(number),
                Some(Err(_)) => {
                    failures.push(PostingLineFailure::InvalidBudgetAccountNumber {
                        value: line.budget_account_number.clone().unwrap_or_default(),
                    });
                    None
                }
            };
        let contact_account_number =
            match non_empty(line.contact_account_number.as_deref()).map(AccountNumber::new) {
                None => None,
                Some(Ok(number)) => Some(number),
                Some(Err(_)) => {
                    failures.push(PostingLineFailure::InvalidContactAccountNumber {
                        value: line.contact_account_number.clone().unwrap_or_default(),
                    });
                    None
                }
            };

        if let (true, Some(account_number)) = (failures.is_empty(), account_number) {
            lines.push(PostingLine {
                identifier: line.identifier.map(Into::into),
                posting_date: line.posting_date,
                reference: non_empty(line.reference.as_deref()).map(str::to_string),
                account_number,
                details: line.details.clone(),
                budget_account_number,
                debit: line.debit,
                credit: line.credit,
                contact_account_number,
                sort_order: line.sort_order,
            });
        } else {
            rejected.push(RejectedLine {
                line_index,
                failures,
            });
        }
    }

    if !rejected.is_empty() {
        return Err(ServiceError::Rejected(JournalRejection {
            line_count: model.apply_posting_lines.len(),
            rejected,
        }));
    }

    Ok(PostingJournal {
        accounting_number,
        lines,
    })
}

pub fn result_to_model(result: &PostingJournalResult) -> ApplyPostingJournalResultModel {
    ApplyPostingJournalResultModel {
        posting_lines: result.lines.iter().map(applied_line_to_model).collect(),
        posting_warnings: result.warnings.iter().map(warning_to_model).collect(),
    }
}

pub fn applied_line_to_model(line: &AppliedPostingLine) -> PostingLineModel {
    PostingLineModel {
        identifier: (*line.identifier.as_uuid()),
        posting_date: line.posting_date,
        reference: line.reference.clone(),
        account: identification_to_model(&line.account),
        account_values_at_posting_date: Some(credit_values_to_model(&line.account_values)),
        details: line.details.clone(),
        budget_account: line.budget_account.as_ref().map(identification_to_model),
        budget_account_values_at_posting_date: line
            .budget_account_values
            .as_ref()
            .map(budget_values_to_model),
        debit: line.debit,
        credit: line.credit,
        contact_account: line.contact_account.as_ref().map(identification_to_model),
        contact_account_values_at_posting_date: line
            .contact_account_values
            .as_ref()
            .map(balance_values_to_model),
        sort_order: line.sort_order,
    }
}

pub fn warning_to_model(warning: &PostingWarning) -> PostingWarningModel {
    PostingWarningModel {
        reason: warning.reason,
        account: identification_to_model(&warning.account),
        amount: warning.amount,
        posting_line: applied_line_to_model(&warning.line),
    }
}

fn identification_to_model(identification: &AccountIdentification) -> AccountIdentificationModel {
    AccountIdentificationModel {
        account_number: identification.number.as_str().to_string(),
        account_name: identification.name.clone(),
    }
}

fn credit_values_to_model(values: &CreditValues) -> CreditInfoValuesModel {
    CreditInfoValuesModel {
        balance: values.balance,
        credit: values.credit,
        available: values.available(),
    }
}

fn budget_values_to_model(values: &BudgetValues) -> BudgetInfoValuesModel {
    BudgetInfoValuesModel {
        budget: values.budget(),
        posted: values.posted,
        available: values.available(),
    }
}

fn balance_values_to_model(values: &BalanceValues) -> BalanceInfoValuesModel {
    BalanceInfoValuesModel {
        balance: values.balance,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
