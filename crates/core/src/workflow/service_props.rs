//! Property-based tests for WorkflowService.

use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use journal_shared::types::{Money, UserId};

use super::approval::{Approver, UserRole};
use super::error::WorkflowError;
use super::service::WorkflowService;
use super::types::TransitionDenied;
use crate::ledger::types::{EntryStatus, EntryType, JournalEntry, JournalLine};

fn arb_status() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        Just(EntryStatus::Draft),
        Just(EntryStatus::PendingApproval),
        Just(EntryStatus::Posted),
        Just(EntryStatus::Rejected),
    ]
}

fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn arb_approving_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Approver),
        Just(UserRole::Accountant),
        Just(UserRole::Admin),
        Just(UserRole::Owner),
    ]
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,40}"
}

fn entry(status: EntryStatus, created_by: UserId) -> JournalEntry {
    JournalEntry::new(
        EntryType::Manual,
        status,
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        "generated",
        vec![
            JournalLine::debit("1000", Money::from_major(10)),
            JournalLine::credit("2000", Money::from_major(10)),
        ],
        created_by,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approving one's own entry fails with InvalidTransition in every status.
    #[test]
    fn prop_no_self_approval(
        status in arb_status(),
        user in arb_user(),
        role in arb_approving_role(),
    ) {
        let approver = Approver::new(user, role, None).unwrap();
        let result = WorkflowService::approve(&entry(status, user), &approver);
        prop_assert_eq!(
            result.unwrap_err(),
            WorkflowError::InvalidTransition {
                from: status,
                to: EntryStatus::Posted,
                reason: TransitionDenied::SelfApproval,
            }
        );
    }

    /// Only a pending entry can be approved by someone else.
    #[test]
    fn prop_approve_requires_pending(
        status in arb_status(),
        creator in arb_user(),
        approver_id in arb_user(),
    ) {
        prop_assume!(creator != approver_id);
        let approver = Approver::new(approver_id, UserRole::Accountant, None).unwrap();
        let result = WorkflowService::approve(&entry(status, creator), &approver);
        prop_assert_eq!(result.is_ok(), status == EntryStatus::PendingApproval);
    }

    /// Terminal states refuse every transition.
    #[test]
    fn prop_terminal_states_refuse_transitions(
        status in arb_status(),
        user in arb_user(),
        reason in arb_reason(),
    ) {
        prop_assume!(status.is_terminal());
        let approver = Approver::new(user, UserRole::Admin, None).unwrap();
        let submit_refused = matches!(
            WorkflowService::submit(status, user),
            Err(WorkflowError::InvalidTransition { .. })
        );
        let reject_refused = matches!(
            WorkflowService::reject(status, &approver, &reason),
            Err(WorkflowError::InvalidTransition { .. })
        );
        prop_assert!(submit_refused);
        prop_assert!(reject_refused);
    }

    /// Roles below Approver never receive the approval capability.
    #[test]
    fn prop_low_roles_cannot_approve(user in arb_user()) {
        for role in [UserRole::Viewer, UserRole::Submitter] {
            let refused = matches!(
                Approver::new(user, role, None),
                Err(WorkflowError::NotAuthorizedToApprove { .. })
            );
            prop_assert!(refused);
        }
    }

    /// Successful actions always land on a valid transition.
    #[test]
    fn prop_actions_follow_valid_transitions(
        status in arb_status(),
        user in arb_user(),
        reason in arb_reason(),
    ) {
        let approver = Approver::new(UserId::new(), UserRole::Owner, None).unwrap();
        if let Ok(action) = WorkflowService::submit(status, user) {
            prop_assert!(WorkflowService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = WorkflowService::reject(status, &approver, &reason) {
            prop_assert!(WorkflowService::is_valid_transition(status, action.new_status()));
        }
        if let Ok(action) = WorkflowService::approve(&entry(status, user), &approver) {
            prop_assert!(WorkflowService::is_valid_transition(status, action.new_status()));
        }
    }
}
