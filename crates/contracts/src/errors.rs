//! Service error taxonomy and the structured payloads the host returns.

use thiserror::Error;

use ledgerdesk_accounting::JournalRejection;
use ledgerdesk_core::DomainError;

use crate::models::{ErrorModel, RejectedPostingLineModel};

/// Failure of one service call.
///
/// Warnings never appear here — they ride along on the success payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The journal failed validation; nothing was applied.
    #[error(transparent)]
    Rejected(#[from] JournalRejection),

    /// A domain failure outside journal validation (unknown accounting,
    /// malformed input, broken invariant).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ServiceError {
    /// Structured payload for the Web API host to serialize.
    pub fn to_model(&self) -> ErrorModel {
        match self {
            ServiceError::Rejected(rejection) => ErrorModel {
                error: "validation_error".to_string(),
                message: rejection.to_string(),
                rejected_lines: rejection
                    .rejected
                    .iter()
                    .map(|line| RejectedPostingLineModel {
                        line_index: line.line_index as u32,
                        messages: line.failures.iter().map(ToString::to_string).collect(),
                    })
                    .collect(),
            },
            ServiceError::Domain(domain) => ErrorModel {
                error: match domain {
                    DomainError::Validation(_) | DomainError::InvalidId(_) => "validation_error",
                    DomainError::InvariantViolation(_) => "invariant_violation",
                    DomainError::NotFound(_) => "not_found",
                }
                .to_string(),
                message: domain.to_string(),
                rejected_lines: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use ledgerdesk_accounting::{PostingLineFailure, RejectedLine};

    use super::*;

    #[test]
    fn rejection_payload_lists_every_failed_line() {
        let error = ServiceError::Rejected(JournalRejection {
            line_count: 3,
            rejected: vec![RejectedLine {
                line_index: 2,
                failures: vec![
                    PostingLineFailure::AmountMissing,
                    PostingLineFailure::DetailsInvalid,
                ],
            }],
        });

        let model = error.to_model();
        assert_eq!(model.error, "validation_error");
        assert_eq!(model.rejected_lines.len(), 1);
        assert_eq!(model.rejected_lines[0].line_index, 2);
        assert_eq!(model.rejected_lines[0].messages.len(), 2);
    }

    #[test]
    fn not_found_maps_to_its_own_code() {
        let error = ServiceError::Domain(DomainError::not_found("accounting 42"));
        assert_eq!(error.to_model().error, "not_found");
    }
}
