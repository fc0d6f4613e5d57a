//! Workflow error types for entry lifecycle management.

use journal_shared::types::{Money, UserId};
use thiserror::Error;

use super::approval::UserRole;
use super::types::TransitionDenied;
use crate::ledger::types::EntryStatus;

/// Errors that can occur during workflow operations.
///
/// None of these leave a mark on the entry: a refused transition is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current status.
        from: EntryStatus,
        /// The attempted target status.
        to: EntryStatus,
        /// Why the transition was refused.
        reason: TransitionDenied,
    },

    /// The user's role cannot approve entries.
    #[error("User {user_id} with role {role} is not authorized to approve entries")]
    NotAuthorizedToApprove {
        /// The user who attempted to approve.
        user_id: UserId,
        /// The user's role.
        role: UserRole,
    },

    /// Entry amount exceeds the approver's limit.
    #[error("Entry amount {amount} exceeds user approval limit {limit}")]
    ExceedsApprovalLimit {
        /// The entry's debit total.
        amount: Money,
        /// The approver's limit.
        limit: Money,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Only the creator can act on a draft.
    #[error("Only the creator can modify or discard this draft")]
    NotEntryCreator,

    /// Only drafts can be edited or discarded.
    #[error("Entry in status {0} is not a draft")]
    NotDraft(EntryStatus),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RejectionReasonRequired => 400,

            Self::InvalidTransition {
                reason: TransitionDenied::SelfApproval,
                ..
            }
            | Self::NotAuthorizedToApprove { .. }
            | Self::ExceedsApprovalLimit { .. }
            | Self::NotEntryCreator => 403,

            Self::InvalidTransition {
                reason: TransitionDenied::WrongState | TransitionDenied::InProgress,
                ..
            }
            | Self::NotDraft(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAuthorizedToApprove { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::ExceedsApprovalLimit { .. } => "EXCEEDS_APPROVAL_LIMIT",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::NotEntryCreator => "NOT_ENTRY_CREATOR",
            Self::NotDraft(_) => "NOT_DRAFT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: EntryStatus::Posted,
            to: EntryStatus::Rejected,
            reason: TransitionDenied::WrongState,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("posted"));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_self_approval_is_forbidden() {
        let err = WorkflowError::InvalidTransition {
            from: EntryStatus::PendingApproval,
            to: EntryStatus::Posted,
            reason: TransitionDenied::SelfApproval,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_concurrent_approval_is_conflict() {
        let err = WorkflowError::InvalidTransition {
            from: EntryStatus::PendingApproval,
            to: EntryStatus::Posted,
            reason: TransitionDenied::InProgress,
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("already being posted"));
    }

    #[test]
    fn test_not_authorized_error() {
        let err = WorkflowError::NotAuthorizedToApprove {
            user_id: UserId::new(),
            role: UserRole::Submitter,
        };
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains("submitter"));
    }

    #[test]
    fn test_exceeds_limit_error() {
        let err = WorkflowError::ExceedsApprovalLimit {
            amount: Money::from_major(100),
            limit: Money::from_major(50),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "EXCEEDS_APPROVAL_LIMIT");
    }

    #[test]
    fn test_rejection_reason_required_error() {
        let err = WorkflowError::RejectionReasonRequired;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "REJECTION_REASON_REQUIRED");
    }
}
