//! State machine for entry approval.
//!
//! Every method is a pure check over the entry's current state that returns
//! the [`WorkflowAction`] to record, or the reason the transition is refused.

use chrono::Utc;
use journal_shared::types::UserId;

use super::approval::Approver;
use super::error::WorkflowError;
use super::types::{TransitionDenied, WorkflowAction};
use crate::ledger::types::{EntryStatus, JournalEntry};

/// Stateless service for entry workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Submit a draft for approval.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Submit)` if the entry is a draft
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn submit(
        current_status: EntryStatus,
        submitted_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            EntryStatus::Draft => Ok(WorkflowAction::Submit {
                submitted_by,
                submitted_at: Utc::now(),
            }),
            _ => Err(wrong_state(current_status, EntryStatus::PendingApproval)),
        }
    }

    /// Approve a pending entry.
    ///
    /// Self-approval is refused regardless of the entry's status.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Approve)` if the approver may post the entry
    /// * `Err(WorkflowError::InvalidTransition)` for self-approval or a
    ///   non-pending entry
    /// * `Err(WorkflowError::ExceedsApprovalLimit)` if the debit total is over
    ///   the approver's limit
    pub fn approve(
        entry: &JournalEntry,
        approver: &Approver,
    ) -> Result<WorkflowAction, WorkflowError> {
        if approver.user_id() == entry.created_by {
            return Err(WorkflowError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Posted,
                reason: TransitionDenied::SelfApproval,
            });
        }
        if entry.status != EntryStatus::PendingApproval {
            return Err(wrong_state(entry.status, EntryStatus::Posted));
        }
        approver.check_limit(entry.totals().debit)?;

        Ok(WorkflowAction::Approve {
            approved_by: approver.user_id(),
        })
    }

    /// Reject a pending entry.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Reject)` if the entry is pending
    /// * `Err(WorkflowError::InvalidTransition)` if not pending
    /// * `Err(WorkflowError::RejectionReasonRequired)` if the reason is blank
    pub fn reject(
        current_status: EntryStatus,
        approver: &Approver,
        rejection_reason: &str,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_status != EntryStatus::PendingApproval {
            return Err(wrong_state(current_status, EntryStatus::Rejected));
        }
        let reason = rejection_reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }

        Ok(WorkflowAction::Reject {
            rejected_by: approver.user_id(),
            rejection_reason: reason.to_string(),
        })
    }

    /// Check that `user` may edit or discard the draft.
    pub fn check_draft_owner(entry: &JournalEntry, user: UserId) -> Result<(), WorkflowError> {
        if !entry.status.is_editable() {
            return Err(WorkflowError::NotDraft(entry.status));
        }
        if entry.created_by != user {
            return Err(WorkflowError::NotEntryCreator);
        }
        Ok(())
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → PendingApproval (submit)
    /// - PendingApproval → Posted (approve)
    /// - PendingApproval → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (EntryStatus::Draft, EntryStatus::PendingApproval)
                | (
                    EntryStatus::PendingApproval,
                    EntryStatus::Posted | EntryStatus::Rejected
                )
        )
    }
}

fn wrong_state(from: EntryStatus, to: EntryStatus) -> WorkflowError {
    WorkflowError::InvalidTransition {
        from,
        to,
        reason: TransitionDenied::WrongState,
    }
}
