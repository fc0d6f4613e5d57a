//! Workflow domain types for entry lifecycle management.

use std::fmt;

use chrono::{DateTime, Utc};
use journal_shared::types::UserId;
use serde::Serialize;

use crate::ledger::types::{EntryStatus, JournalEntry};

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDenied {
    /// The entry is not in the state the action starts from.
    WrongState,
    /// The approver created the entry.
    SelfApproval,
    /// Another approval is already posting the entry.
    InProgress,
}

impl fmt::Display for TransitionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WrongState => "entry is not in the required state",
            Self::SelfApproval => "an entry cannot be approved by its creator",
            Self::InProgress => "the entry is already being posted",
        })
    }
}

/// Workflow action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Submit a draft for approval.
    Submit {
        /// Who submitted.
        submitted_by: UserId,
        /// When the entry was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Approve a pending entry; completes only when posting succeeds.
    Approve {
        /// Who approved.
        approved_by: UserId,
    },
    /// Reject a pending entry.
    Reject {
        /// Who rejected.
        rejected_by: UserId,
        /// The reason for rejection.
        rejection_reason: String,
    },
}

impl WorkflowAction {
    /// Returns the status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> EntryStatus {
        match self {
            Self::Submit { .. } => EntryStatus::PendingApproval,
            Self::Approve { .. } => EntryStatus::Posted,
            Self::Reject { .. } => EntryStatus::Rejected,
        }
    }

    /// Records the action on the entry.
    ///
    /// Approval is not applied here: the posting engine sets the status,
    /// number and approver once the entry is in the log.
    pub fn apply(self, entry: &mut JournalEntry) {
        match self {
            Self::Submit { submitted_at, .. } => {
                entry.status = EntryStatus::PendingApproval;
                entry.submitted_at = Some(submitted_at);
            }
            Self::Reject {
                rejection_reason, ..
            } => {
                entry.status = EntryStatus::Rejected;
                entry.rejection_reason = Some(rejection_reason);
            }
            Self::Approve { .. } => {}
        }
    }
}
