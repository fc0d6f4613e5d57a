//! Journal entry domain types.
//!
//! This module defines the entry, its lines, and the lifecycle enums shared
//! by validation, posting, the workflow and the projections.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use journal_shared::types::{EntryId, Money, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::PeriodKey;

/// Actor recorded as `created_by` for entries submitted by source modules
/// and the recurring scheduler.
pub const SYSTEM_USER: UserId = UserId::from_uuid(Uuid::nil());

/// How an entry came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Submitted by an upstream business module; posts without approval.
    Auto,
    /// Keyed in by a person; requires approval.
    Manual,
    /// Materialized from a recurring template.
    Recurring,
    /// Period-end adjustment or correction; requires approval.
    Adjusting,
}

impl EntryType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Recurring => "recurring",
            Self::Adjusting => "adjusting",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "manual" => Some(Self::Manual),
            "recurring" => Some(Self::Recurring),
            "adjusting" => Some(Self::Adjusting),
            _ => None,
        }
    }

    /// Returns true if entries of this type must carry a source reference.
    #[must_use]
    pub fn requires_source(&self) -> bool {
        matches!(self, Self::Auto | Self::Recurring)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry status in the approval workflow.
///
/// The valid transitions are:
/// - Draft → PendingApproval (submit)
/// - PendingApproval → Posted (approve)
/// - PendingApproval → Rejected (reject)
///
/// Auto entries and autopost recurring entries are born `Posted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Being drafted; lines may still be edited.
    Draft,
    /// Submitted and waiting for an approver.
    PendingApproval,
    /// Applied to the period balances (immutable).
    Posted,
    /// Turned down by an approver (terminal).
    Rejected,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Posted => "posted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending_approval" | "pending" => Some(Self::PendingApproval),
            "posted" => Some(Self::Posted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Posted | Self::Rejected)
    }

    /// Returns true if the entry's lines can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debit or credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl Side {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// One line of a journal entry.
///
/// Exactly one of `debit_amount` / `credit_amount` must be set to a positive
/// value; the validator enforces it before an entry can leave draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account the line posts to.
    pub account_code: String,
    /// Debit amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<Money>,
    /// Credit amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<Money>,
    /// Optional line memo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl JournalLine {
    /// A debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Money) -> Self {
        Self::on_side(account_code, Side::Debit, amount)
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Money) -> Self {
        Self::on_side(account_code, Side::Credit, amount)
    }

    /// A line on the given side.
    #[must_use]
    pub fn on_side(account_code: impl Into<String>, side: Side, amount: Money) -> Self {
        let (debit_amount, credit_amount) = match side {
            Side::Debit => (Some(amount), None),
            Side::Credit => (None, Some(amount)),
        };
        Self {
            account_code: account_code.into(),
            debit_amount,
            credit_amount,
            memo: None,
        }
    }

    /// Attaches a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Side and amount, if exactly one side is set.
    #[must_use]
    pub fn side_amount(&self) -> Option<(Side, Money)> {
        match (self.debit_amount, self.credit_amount) {
            (Some(amount), None) => Some((Side::Debit, amount)),
            (None, Some(amount)) => Some((Side::Credit, amount)),
            _ => None,
        }
    }

    /// Debit amount, zero if this is a credit line.
    #[must_use]
    pub fn debit_or_zero(&self) -> Money {
        self.debit_amount.unwrap_or(Money::ZERO)
    }

    /// Credit amount, zero if this is a debit line.
    #[must_use]
    pub fn credit_or_zero(&self) -> Money {
        self.credit_amount.unwrap_or(Money::ZERO)
    }
}

/// Idempotency key: the upstream module and its document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceKey {
    /// Submitting module, e.g. `AP`.
    pub module: String,
    /// The module's document identifier, e.g. `INV-892`.
    pub document_id: String,
}

impl SourceKey {
    /// Creates a key.
    #[must_use]
    pub fn new(module: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            document_id: document_id.into(),
        }
    }

    /// Returns true if either part is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.module.trim().is_empty() || self.document_id.trim().is_empty()
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.document_id)
    }
}

/// Posting sequence number, assigned once at posting time.
///
/// Gapless and strictly increasing within a period, unique across the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryNumber {
    /// The period whose counter issued the number.
    pub period: PeriodKey,
    /// Position in the period's posting order, starting at 1.
    pub sequence: u64,
}

impl fmt::Display for EntryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JE-{}-{:06}", self.period.compact(), self.sequence)
    }
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Opaque identifier.
    pub id: EntryId,
    /// Posting number, set only when the entry posts.
    pub entry_number: Option<EntryNumber>,
    /// Accounting date.
    pub date: NaiveDate,
    /// Human-readable description.
    pub description: String,
    /// Origin of the entry.
    pub entry_type: EntryType,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
    /// Upstream reference; required for auto and recurring entries.
    pub source: Option<SourceKey>,
    /// Who created the entry.
    pub created_by: UserId,
    /// Who approved the entry; set only on approval.
    pub approver: Option<UserId>,
    /// Optional memo.
    pub memo: Option<String>,
    /// The entry this one corrects.
    pub reversal_of: Option<EntryId>,
    /// The entry that corrected this one.
    pub corrected_by: Option<EntryId>,
    /// Why the entry was rejected.
    pub rejection_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// When the entry was submitted for approval.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the entry posted.
    pub posted_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Creates an entry with no workflow history.
    #[must_use]
    pub fn new(
        entry_type: EntryType,
        status: EntryStatus,
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
        created_by: UserId,
    ) -> Self {
        Self {
            id: EntryId::new(),
            entry_number: None,
            date,
            description: description.into(),
            entry_type,
            status,
            lines,
            source: None,
            created_by,
            approver: None,
            memo: None,
            reversal_of: None,
            corrected_by: None,
            rejection_reason: None,
            created_at: Utc::now(),
            submitted_at: None,
            posted_at: None,
        }
    }

    /// The period the entry's date falls in.
    #[must_use]
    pub fn period(&self) -> PeriodKey {
        PeriodKey::from_date(self.date)
    }

    /// Debit and credit sums over the lines (saturating; display only).
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::new(
            self.lines.iter().map(JournalLine::debit_or_zero).sum(),
            self.lines.iter().map(JournalLine::credit_or_zero).sum(),
        )
    }

    /// Returns true if any line touches the account.
    #[must_use]
    pub fn touches_account(&self, account_code: &str) -> bool {
        self.lines.iter().any(|l| l.account_code == account_code)
    }

    /// Returns true if the entry has posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == EntryStatus::Posted
    }
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debits.
    pub debit: Money,
    /// Total credits.
    pub credit: Money,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Money, credit: Money) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Money {
        self.debit.saturating_sub(self.credit)
    }
}
