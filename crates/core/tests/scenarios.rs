//! End-to-end journal scenarios.
//!
//! Drives a [`Journal`] through the source-module, manual-entry, recurring,
//! correction and period contracts and checks the resulting balances.

#![allow(clippy::too_many_lines)]

use chrono::NaiveDate;
use journal_core::accounts::{Account, InMemoryAccountDirectory, NormalSide};
use journal_core::ledger::{
    EntryStatus, EntryType, JournalLine, LedgerError, PeriodError, PeriodKey, SYSTEM_USER,
    ValidationError,
};
use journal_core::query::EntryFilter;
use journal_core::recurring::{RecurrenceRule, RecurringTemplate};
use journal_core::workflow::{Approver, LineCorrection, TransitionDenied, UserRole, WorkflowError};
use journal_core::{
    DraftInput, DraftUpdate, Journal, ReclassificationRequest, ReversalRequest, SourceSubmission,
};
use journal_shared::types::{EntryId, Money, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const CASH: &str = "1000";
const MATERIALS: &str = "1300";
const ACCUMULATED_DEPRECIATION: &str = "1590";
const ACCOUNTS_PAYABLE: &str = "2100";
const DEPRECIATION: &str = "6100";
const SUPPLIES: &str = "6200";
const TRAVEL: &str = "6300";

fn amount(value: Decimal) -> Money {
    Money::from_decimal(value).unwrap()
}

fn period(key: &str) -> PeriodKey {
    key.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn journal() -> Journal {
    let directory = InMemoryAccountDirectory::from_accounts([
        Account::new(CASH, "Cash", NormalSide::Debit),
        Account::new(MATERIALS, "Materials Inventory", NormalSide::Debit),
        Account::new(ACCUMULATED_DEPRECIATION, "Accumulated Depreciation", NormalSide::Credit),
        Account::new(ACCOUNTS_PAYABLE, "Accounts Payable", NormalSide::Credit),
        Account::new(DEPRECIATION, "Depreciation Expense", NormalSide::Debit),
        Account::new(SUPPLIES, "Office Supplies", NormalSide::Debit),
        Account::new(TRAVEL, "Travel Expense", NormalSide::Debit),
    ])
    .unwrap();
    let journal = Journal::new(directory);
    journal.open_period(period("2026-01")).unwrap();
    journal
}

fn invoice(document_id: &str, value: Decimal) -> SourceSubmission {
    SourceSubmission {
        source_module: "AP".to_string(),
        source_document_id: document_id.to_string(),
        date: date(2026, 1, 15),
        description: None,
        lines: vec![
            JournalLine::debit(MATERIALS, amount(value)),
            JournalLine::credit(ACCOUNTS_PAYABLE, amount(value)),
        ],
        memo: None,
    }
}

fn approver(role: UserRole) -> Approver {
    Approver::new(UserId::new(), role, None).unwrap()
}

/// Drafts, submits and approves a manual entry; returns its id.
fn post_manual(journal: &Journal, lines: Vec<JournalLine>) -> EntryId {
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(date(2026, 1, 20), "Manual entry", lines, clerk))
        .unwrap();
    journal.submit_for_approval(id, clerk).unwrap();
    journal.approve(id, &approver(UserRole::Accountant)).unwrap();
    id
}

#[test]
fn test_auto_entry_posts_immediately() {
    let journal = journal();

    let outcome = journal.submit(invoice("INV-892", dec!(24000))).unwrap();

    assert!(!outcome.duplicate);
    assert_eq!(outcome.entry_number.unwrap().to_string(), "JE-202601-000001");
    let entry = journal.get_entry(outcome.entry_id).unwrap();
    assert_eq!(entry.status, EntryStatus::Posted);
    assert_eq!(entry.entry_type, EntryType::Auto);
    assert_eq!(entry.created_by, SYSTEM_USER);
    assert_eq!(entry.description, "AP INV-892");
    assert!(entry.posted_at.is_some());

    let trial_balance = journal.trial_balance(period("2026-01")).unwrap();
    assert!(trial_balance.is_balanced);
    assert_eq!(trial_balance.difference(), Money::ZERO);
    assert_eq!(trial_balance.total_debit, amount(dec!(24000)));
    assert_eq!(journal.log().len(), 1);
}

#[test]
fn test_duplicate_submission_returns_original() {
    let journal = journal();
    let first = journal.submit(invoice("INV-892", dec!(24000))).unwrap();

    let second = journal.submit(invoice("INV-892", dec!(31000))).unwrap();

    assert!(second.duplicate);
    assert_eq!(second.entry_id, first.entry_id);
    assert_eq!(second.entry_number, first.entry_number);
    assert_eq!(journal.log().len(), 1);
    let trial_balance = journal.trial_balance(period("2026-01")).unwrap();
    assert_eq!(trial_balance.total_debit, amount(dec!(24000)));
}

#[test]
fn test_duplicate_key_is_trimmed() {
    let journal = journal();
    let first = journal.submit(invoice("INV-892", dec!(240))).unwrap();

    let mut padded = invoice(" INV-892 ", dec!(240));
    padded.source_module = " AP".to_string();
    let second = journal.submit(padded).unwrap();

    assert!(second.duplicate);
    assert_eq!(second.entry_id, first.entry_id);
}

#[test]
fn test_invalid_submission_leaves_key_free() {
    let journal = journal();
    let mut broken = invoice("INV-900", dec!(100));
    broken.lines[1] = JournalLine::credit(ACCOUNTS_PAYABLE, amount(dec!(90)));

    let err = journal.submit(broken).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::Unbalanced { .. })
    ));

    let retry = journal.submit(invoice("INV-900", dec!(100))).unwrap();
    assert!(!retry.duplicate);
    assert!(retry.entry_number.is_some());
}

#[test]
fn test_blank_source_reference_rejected() {
    let journal = journal();
    let err = journal.submit(invoice("   ", dec!(100))).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::MissingSourceReference { .. })
    ));
    assert!(journal.log().is_empty());
}

#[test]
fn test_unbalanced_draft_cannot_be_submitted() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 10),
            "Office supplies",
            vec![
                JournalLine::debit(SUPPLIES, amount(dec!(100))),
                JournalLine::credit(CASH, amount(dec!(90))),
            ],
            clerk,
        ))
        .unwrap();

    let err = journal.validate_entry(id).unwrap_err();
    assert_eq!(
        err,
        LedgerError::Validation(ValidationError::Unbalanced {
            debit: amount(dec!(100)),
            credit: amount(dec!(90)),
        })
    );

    let err = journal.submit_for_approval(id, clerk).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(journal.get_entry(id).unwrap().status, EntryStatus::Draft);
}

#[test]
fn test_approved_entry_cannot_be_rejected() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 10),
            "Office supplies",
            vec![
                JournalLine::debit(SUPPLIES, amount(dec!(100))),
                JournalLine::credit(CASH, amount(dec!(100))),
            ],
            clerk,
        ))
        .unwrap();
    let pending = journal.submit_for_approval(id, clerk).unwrap();
    assert_eq!(pending.status, EntryStatus::PendingApproval);
    assert!(pending.submitted_at.is_some());

    let manager = approver(UserRole::Accountant);
    let posted = journal.approve(id, &manager).unwrap();
    assert_eq!(posted.status, EntryStatus::Posted);
    assert_eq!(posted.approver, Some(manager.user_id()));
    assert!(posted.entry_number.is_some());

    let err = journal.reject(id, &manager, "too late").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Workflow(WorkflowError::InvalidTransition {
            from: EntryStatus::Posted,
            to: EntryStatus::Rejected,
            reason: TransitionDenied::WrongState,
        })
    ));
}

#[test]
fn test_self_approval_refused() {
    let journal = journal();
    let owner = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 10),
            "Owner expense",
            vec![
                JournalLine::debit(TRAVEL, amount(dec!(250))),
                JournalLine::credit(CASH, amount(dec!(250))),
            ],
            owner,
        ))
        .unwrap();
    journal.submit_for_approval(id, owner).unwrap();

    let as_owner = Approver::new(owner, UserRole::Owner, None).unwrap();
    let err = journal.approve(id, &as_owner).unwrap_err();

    assert_eq!(err.http_status_code(), 403);
    assert!(matches!(
        err,
        LedgerError::Workflow(WorkflowError::InvalidTransition {
            reason: TransitionDenied::SelfApproval,
            ..
        })
    ));
    assert_eq!(
        journal.get_entry(id).unwrap().status,
        EntryStatus::PendingApproval
    );
}

#[test]
fn test_approval_limit_enforced() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 12),
            "Conference travel",
            vec![
                JournalLine::debit(TRAVEL, amount(dec!(1500))),
                JournalLine::credit(CASH, amount(dec!(1500))),
            ],
            clerk,
        ))
        .unwrap();
    journal.submit_for_approval(id, clerk).unwrap();

    let junior = Approver::new(UserId::new(), UserRole::Approver, Some(amount(dec!(1000)))).unwrap();
    let err = journal.approve(id, &junior).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Workflow(WorkflowError::ExceedsApprovalLimit { .. })
    ));

    journal.approve(id, &approver(UserRole::Admin)).unwrap();
}

#[test]
fn test_rejection_requires_reason() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 12),
            "Supplies",
            vec![
                JournalLine::debit(SUPPLIES, amount(dec!(40))),
                JournalLine::credit(CASH, amount(dec!(40))),
            ],
            clerk,
        ))
        .unwrap();
    journal.submit_for_approval(id, clerk).unwrap();
    let manager = approver(UserRole::Accountant);

    assert_eq!(
        journal.reject(id, &manager, "  ").unwrap_err(),
        LedgerError::Workflow(WorkflowError::RejectionReasonRequired)
    );

    let rejected = journal.reject(id, &manager, "missing receipt").unwrap();
    assert_eq!(rejected.status, EntryStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("missing receipt"));
    assert!(rejected.entry_number.is_none());
}

#[test]
fn test_draft_editing_is_creator_only() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 5),
            "Draft",
            vec![JournalLine::debit(SUPPLIES, amount(dec!(10)))],
            clerk,
        ))
        .unwrap();

    let update = DraftUpdate {
        lines: Some(vec![
            JournalLine::debit(SUPPLIES, amount(dec!(10))),
            JournalLine::credit(CASH, amount(dec!(10))),
        ]),
        ..DraftUpdate::default()
    };
    let err = journal
        .update_draft(id, UserId::new(), update.clone())
        .unwrap_err();
    assert_eq!(err, LedgerError::Workflow(WorkflowError::NotEntryCreator));

    let updated = journal.update_draft(id, clerk, update).unwrap();
    assert_eq!(updated.lines.len(), 2);
    assert!(journal.validate_entry(id).unwrap().is_balanced);

    journal.discard_draft(id, clerk).unwrap();
    assert_eq!(
        journal.get_entry(id).unwrap_err(),
        LedgerError::EntryNotFound(id)
    );
}

#[test]
fn test_auto_entries_cannot_be_drafted() {
    let journal = journal();
    let mut input = DraftInput::manual(date(2026, 1, 5), "Sneaky", Vec::new(), UserId::new());
    input.entry_type = EntryType::Auto;
    assert!(matches!(
        journal.create_draft(input),
        Err(LedgerError::NotDraftable(_))
    ));
}

#[test]
fn test_recurring_autopost_materializes_once_per_period() {
    let journal = journal();
    let template = RecurringTemplate::new(
        "Monthly Depreciation",
        vec![
            JournalLine::debit(DEPRECIATION, amount(dec!(500))),
            JournalLine::credit(ACCUMULATED_DEPRECIATION, amount(dec!(500))),
        ],
        RecurrenceRule::Monthly,
        true,
        UserId::new(),
    );
    let template_id = journal.register_template(template).unwrap();

    let february = journal.open_period(period("2026-02")).unwrap();
    assert!(february.failures.is_empty());
    assert_eq!(february.materialized.len(), 1);
    let first = &february.materialized[0];
    assert!(!first.duplicate);
    assert_eq!(first.status, EntryStatus::Posted);

    let again = journal.open_period(period("2026-02")).unwrap();
    assert_eq!(again.materialized.len(), 1);
    assert!(again.materialized[0].duplicate);
    assert_eq!(again.materialized[0].entry_id, first.entry_id);

    let march = journal.open_period(period("2026-03")).unwrap();
    let second = &march.materialized[0];
    assert_ne!(second.entry_id, first.entry_id);

    let feb_entry = journal.get_entry(first.entry_id).unwrap();
    let mar_entry = journal.get_entry(second.entry_id).unwrap();
    assert_eq!(feb_entry.entry_type, EntryType::Recurring);
    assert_eq!(feb_entry.date, date(2026, 2, 28));
    assert_eq!(
        feb_entry.source.unwrap().document_id,
        format!("{template_id}:2026-02")
    );
    assert_eq!(
        mar_entry.source.unwrap().document_id,
        format!("{template_id}:2026-03")
    );

    let trial_balance = journal.trial_balance(period("2026-03")).unwrap();
    assert_eq!(trial_balance.total_credit, amount(dec!(500)));
}

#[test]
fn test_recurring_without_autopost_waits_for_approval() {
    let journal = journal();
    let owner = UserId::new();
    let template = RecurringTemplate::new(
        "Quarterly Accrual",
        vec![
            JournalLine::debit(SUPPLIES, amount(dec!(75))),
            JournalLine::credit(ACCOUNTS_PAYABLE, amount(dec!(75))),
        ],
        RecurrenceRule::Monthly,
        false,
        owner,
    );
    journal.register_template(template).unwrap();

    let report = journal.open_period(period("2026-02")).unwrap();
    let instance = &report.materialized[0];
    assert_eq!(instance.status, EntryStatus::PendingApproval);
    assert_eq!(journal.get_entry(instance.entry_id).unwrap().created_by, owner);

    // A rejected instance frees its key so the next open materializes it again.
    journal
        .reject(instance.entry_id, &approver(UserRole::Accountant), "wrong amount")
        .unwrap();
    let retry = journal.open_period(period("2026-02")).unwrap();
    let fresh = &retry.materialized[0];
    assert!(!fresh.duplicate);
    assert_ne!(fresh.entry_id, instance.entry_id);

    let posted = journal
        .approve(fresh.entry_id, &approver(UserRole::Accountant))
        .unwrap();
    assert_eq!(posted.status, EntryStatus::Posted);
    let repeat = journal.open_period(period("2026-02")).unwrap();
    assert!(repeat.materialized[0].duplicate);
}

#[test]
fn test_deactivated_template_stops_firing() {
    let journal = journal();
    let template = RecurringTemplate::new(
        "Rent",
        vec![
            JournalLine::debit(SUPPLIES, amount(dec!(900))),
            JournalLine::credit(CASH, amount(dec!(900))),
        ],
        RecurrenceRule::Monthly,
        true,
        UserId::new(),
    );
    let id = journal.register_template(template).unwrap();
    journal.deactivate_template(id).unwrap();

    let report = journal.open_period(period("2026-02")).unwrap();
    assert!(report.materialized.is_empty());
}

#[test]
fn test_reclassification_mirrors_miscoded_line() {
    let journal = journal();
    let original_id = post_manual(
        &journal,
        vec![
            JournalLine::debit(TRAVEL, amount(dec!(500))),
            JournalLine::credit(CASH, amount(dec!(500))),
        ],
    );
    let original = journal.get_entry(original_id).unwrap();

    let accountant = UserId::new();
    let correction_id = journal
        .reclassify(ReclassificationRequest {
            original: original_id,
            corrections: vec![LineCorrection::new(0, SUPPLIES)],
            date: date(2026, 1, 25),
            created_by: accountant,
            memo: Some("booked to the wrong expense".to_string()),
        })
        .unwrap();

    let correction = journal.get_entry(correction_id).unwrap();
    assert_eq!(correction.entry_type, EntryType::Adjusting);
    assert_eq!(correction.status, EntryStatus::Draft);
    assert_eq!(correction.reversal_of, Some(original_id));
    assert_eq!(correction.lines.len(), 2);
    assert_eq!(correction.lines[0].account_code, TRAVEL);
    assert_eq!(correction.lines[0].credit_amount, Some(amount(dec!(500))));
    assert_eq!(correction.lines[1].account_code, SUPPLIES);
    assert_eq!(correction.lines[1].debit_amount, Some(amount(dec!(500))));

    // Nothing changes on the original until the correction posts.
    assert_eq!(journal.get_entry(original_id).unwrap(), original);

    journal.submit_for_approval(correction_id, accountant).unwrap();
    journal
        .approve(correction_id, &approver(UserRole::Admin))
        .unwrap();

    let after = journal.get_entry(original_id).unwrap();
    assert_eq!(after.corrected_by, Some(correction_id));
    assert_eq!(after.lines, original.lines);
    assert_eq!(after.entry_number, original.entry_number);
    assert_eq!(after.status, EntryStatus::Posted);

    let trial_balance = journal.trial_balance(period("2026-01")).unwrap();
    let travel = trial_balance
        .rows
        .iter()
        .find(|r| r.account_code == TRAVEL)
        .unwrap();
    assert_eq!(travel.balance, Money::ZERO);
    let supplies = trial_balance
        .rows
        .iter()
        .find(|r| r.account_code == SUPPLIES)
        .unwrap();
    assert_eq!(supplies.balance, amount(dec!(500)));
    assert!(trial_balance.is_balanced);
}

#[test]
fn test_second_correction_refused() {
    let journal = journal();
    let original_id = post_manual(
        &journal,
        vec![
            JournalLine::debit(TRAVEL, amount(dec!(80))),
            JournalLine::credit(CASH, amount(dec!(80))),
        ],
    );
    let accountant = UserId::new();
    let first = journal
        .reverse(ReversalRequest {
            original: original_id,
            date: date(2026, 1, 26),
            created_by: accountant,
            reason: "entered twice".to_string(),
        })
        .unwrap();

    let err = journal
        .reclassify(ReclassificationRequest {
            original: original_id,
            corrections: vec![LineCorrection::new(0, SUPPLIES)],
            date: date(2026, 1, 26),
            created_by: accountant,
            memo: None,
        })
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::AlreadyCorrected {
            original: original_id,
            correction: first,
        }
    );

    // Discarding the in-flight correction frees the original again.
    journal.discard_draft(first, accountant).unwrap();
    journal
        .reverse(ReversalRequest {
            original: original_id,
            date: date(2026, 1, 26),
            created_by: accountant,
            reason: "entered twice".to_string(),
        })
        .unwrap();
}

#[test]
fn test_full_reversal_zeroes_accounts() {
    let journal = journal();
    let original = journal.submit(invoice("INV-777", dec!(1250.50))).unwrap();
    let accountant = UserId::new();

    let reversal_id = journal
        .reverse(ReversalRequest {
            original: original.entry_id,
            date: date(2026, 1, 31),
            created_by: accountant,
            reason: "vendor cancelled".to_string(),
        })
        .unwrap();
    let draft = journal.get_entry(reversal_id).unwrap();
    assert!(draft.description.contains("JE-202601-000001"));
    assert!(draft.description.contains("vendor cancelled"));

    journal.submit_for_approval(reversal_id, accountant).unwrap();
    journal
        .approve(reversal_id, &approver(UserRole::Accountant))
        .unwrap();

    let trial_balance = journal.trial_balance(period("2026-01")).unwrap();
    assert!(trial_balance.rows.iter().all(|r| r.balance == Money::ZERO));
    assert_eq!(trial_balance.total_debit, amount(dec!(2501.00)));
    journal.verify_balances().unwrap();
}

#[test]
fn test_drafts_cannot_be_corrected() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(date(2026, 1, 5), "Draft", Vec::new(), clerk))
        .unwrap();
    assert_eq!(
        journal
            .reverse(ReversalRequest {
                original: id,
                date: date(2026, 1, 6),
                created_by: clerk,
                reason: String::new(),
            })
            .unwrap_err(),
        LedgerError::NotCorrectable(id)
    );
}

#[test]
fn test_closed_period_refuses_postings() {
    let journal = journal();
    journal.open_period(period("2026-02")).unwrap();
    journal.submit(invoice("INV-1", dec!(10))).unwrap();

    assert!(matches!(
        journal.close_period(period("2026-02")),
        Err(LedgerError::Period(PeriodError::EarlierPeriodsOpen { .. }))
    ));

    journal.close_period(period("2026-01")).unwrap();
    let err = journal.submit(invoice("INV-2", dec!(10))).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::ClosedPeriod { .. })
    ));

    assert_eq!(
        journal.open_period(period("2026-01")).unwrap_err(),
        LedgerError::Period(PeriodError::AlreadyClosed(period("2026-01")))
    );
    let trial_balance = journal.trial_balance(period("2026-01")).unwrap();
    assert_eq!(trial_balance.total_debit, amount(dec!(10)));
}

#[test]
fn test_unopened_period_treated_as_closed() {
    let journal = journal();
    let mut future = invoice("INV-3", dec!(10));
    future.date = date(2026, 6, 1);
    assert!(matches!(
        journal.submit(future).unwrap_err(),
        LedgerError::Validation(ValidationError::ClosedPeriod { .. })
    ));
}

#[test]
fn test_pending_entry_blocked_once_period_closes() {
    let journal = journal();
    let clerk = UserId::new();
    let id = journal
        .create_draft(DraftInput::manual(
            date(2026, 1, 30),
            "Late accrual",
            vec![
                JournalLine::debit(SUPPLIES, amount(dec!(60))),
                JournalLine::credit(ACCOUNTS_PAYABLE, amount(dec!(60))),
            ],
            clerk,
        ))
        .unwrap();
    journal.submit_for_approval(id, clerk).unwrap();
    journal.close_period(period("2026-01")).unwrap();

    let err = journal.approve(id, &approver(UserRole::Accountant)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::ClosedPeriod { .. })
    ));
    assert_eq!(
        journal.get_entry(id).unwrap().status,
        EntryStatus::PendingApproval
    );
}

#[test]
fn test_account_ledger_carries_opening_balance() {
    let journal = journal();
    journal.open_period(period("2026-02")).unwrap();
    post_manual(
        &journal,
        vec![
            JournalLine::debit(SUPPLIES, amount(dec!(300))),
            JournalLine::credit(CASH, amount(dec!(300))),
        ],
    );

    let mut february = invoice("INV-FEB", dec!(120));
    february.date = date(2026, 2, 3);
    february.lines = vec![
        JournalLine::debit(CASH, amount(dec!(120))),
        JournalLine::credit(ACCOUNTS_PAYABLE, amount(dec!(120))),
    ];
    journal.submit(february).unwrap();
    let mut refund = invoice("INV-FEB-2", dec!(20));
    refund.date = date(2026, 2, 9);
    refund.lines = vec![
        JournalLine::debit(ACCOUNTS_PAYABLE, amount(dec!(20))),
        JournalLine::credit(CASH, amount(dec!(20))),
    ];
    journal.submit(refund).unwrap();

    let ledger = journal.account_ledger(CASH, period("2026-02")).unwrap();
    assert_eq!(ledger.opening_balance, amount(dec!(-300)));
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.lines[0].running.current_balance, amount(dec!(-180)));
    assert_eq!(ledger.lines[1].running.previous_balance, amount(dec!(-180)));
    assert_eq!(ledger.closing_balance, amount(dec!(-200)));
    assert_eq!(ledger.debit_total, amount(dec!(120)));
    assert_eq!(ledger.credit_total, amount(dec!(20)));

    assert!(matches!(
        journal.account_ledger("9999", period("2026-02")),
        Err(LedgerError::AccountNotFound(_))
    ));
}

#[test]
fn test_list_entries_filters() {
    let journal = journal();
    journal.submit(invoice("INV-10", dec!(10))).unwrap();
    journal.submit(invoice("INV-11", dec!(11))).unwrap();
    let clerk = UserId::new();
    journal
        .create_draft(DraftInput::manual(date(2026, 1, 2), "Draft", Vec::new(), clerk))
        .unwrap();

    let posted = journal.list_entries(&EntryFilter {
        status: Some(EntryStatus::Posted),
        ..EntryFilter::default()
    });
    assert_eq!(posted.len(), 2);
    assert!(posted[0].entry_number < posted[1].entry_number);

    let from_ap = journal.list_entries(&EntryFilter {
        source_module: Some("AP".to_string()),
        ..EntryFilter::default()
    });
    assert_eq!(from_ap.len(), 2);

    let drafts = journal.list_entries(&EntryFilter {
        status: Some(EntryStatus::Draft),
        ..EntryFilter::default()
    });
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].created_by, clerk);
}

#[test]
fn test_replay_matches_live_balances() {
    let journal = journal();
    for n in 0..20 {
        journal
            .submit(invoice(&format!("INV-{n}"), Decimal::from(n + 1)))
            .unwrap();
    }
    post_manual(
        &journal,
        vec![
            JournalLine::debit(SUPPLIES, amount(dec!(5))),
            JournalLine::credit(CASH, amount(dec!(5))),
        ],
    );

    journal.verify_balances().unwrap();
    let numbers: Vec<u64> = journal
        .list_entries(&EntryFilter::default())
        .iter()
        .filter_map(|e| e.entry_number.map(|n| n.sequence))
        .collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=21).collect::<Vec<_>>());
}
