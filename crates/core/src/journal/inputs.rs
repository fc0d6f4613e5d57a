//! Request and response types for [`super::Journal`] operations.

use chrono::NaiveDate;
use journal_shared::types::{EntryId, TemplateId, UserId};
use serde::{Deserialize, Serialize};

use crate::ledger::period::{OpenOutcome, PeriodKey};
use crate::ledger::types::{EntryNumber, EntryStatus, EntryType, JournalLine};
use crate::workflow::LineCorrection;

/// An entry submitted by an upstream business module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSubmission {
    /// Submitting module, e.g. `AP`.
    pub source_module: String,
    /// The module's document identifier.
    pub source_document_id: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description; defaults to `"{module} {document}"`.
    #[serde(default)]
    pub description: Option<String>,
    /// Lines.
    pub lines: Vec<JournalLine>,
    /// Optional memo.
    #[serde(default)]
    pub memo: Option<String>,
}

/// Result of a source-module submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    /// The entry holding the source key.
    pub entry_id: EntryId,
    /// True if the key was already taken and nothing new was created.
    pub duplicate: bool,
    /// Posting number, once known.
    pub entry_number: Option<EntryNumber>,
}

/// A hand-keyed draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftInput {
    /// `Manual` or `Adjusting`.
    pub entry_type: EntryType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Lines; may be incomplete while drafting.
    pub lines: Vec<JournalLine>,
    /// Optional memo.
    pub memo: Option<String>,
    /// The drafting user.
    pub created_by: UserId,
}

impl DraftInput {
    /// A manual draft.
    #[must_use]
    pub fn manual(
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
        created_by: UserId,
    ) -> Self {
        Self {
            entry_type: EntryType::Manual,
            date,
            description: description.into(),
            lines,
            memo: None,
            created_by,
        }
    }
}

/// Changes to a draft. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftUpdate {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// Replacement lines.
    pub lines: Option<Vec<JournalLine>>,
    /// New memo.
    pub memo: Option<String>,
}

/// Full reversal of a posted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalRequest {
    /// The posted entry to reverse.
    pub original: EntryId,
    /// Date of the reversing entry.
    pub date: NaiveDate,
    /// Who requests the reversal.
    pub created_by: UserId,
    /// Why.
    pub reason: String,
}

/// Moves lines of a posted entry to the correct accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclassificationRequest {
    /// The posted entry to correct.
    pub original: EntryId,
    /// Which lines move where.
    pub corrections: Vec<LineCorrection>,
    /// Date of the adjusting entry.
    pub date: NaiveDate,
    /// Who requests the correction.
    pub created_by: UserId,
    /// Optional memo.
    pub memo: Option<String>,
}

/// One recurring instance handled during a period open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedInstance {
    /// Source template.
    pub template_id: TemplateId,
    /// The instance entry.
    pub entry_id: EntryId,
    /// Status after materialization.
    pub status: EntryStatus,
    /// True if the instance already existed.
    pub duplicate: bool,
}

/// A template whose instance could not be materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFailure {
    /// Source template.
    pub template_id: TemplateId,
    /// Template name.
    pub name: String,
    /// Error code.
    pub error_code: String,
    /// Error message.
    pub message: String,
}

/// What happened when a period was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOpenReport {
    /// The period.
    pub period: PeriodKey,
    /// Whether this call opened it.
    pub outcome: OpenOutcome,
    /// Recurring instances created or found.
    pub materialized: Vec<MaterializedInstance>,
    /// Templates that failed.
    pub failures: Vec<TemplateFailure>,
}
