//! Ledger error types.
//!
//! - [`ValidationError`]: a candidate entry is structurally or semantically
//!   wrong. Always local, never leaves partial state.
//! - [`PostingError`]: the posting engine could not commit.
//! - [`LedgerError`]: umbrella type returned by the [`crate::Journal`].

use std::fmt;

use chrono::NaiveDate;
use journal_shared::AppError;
use journal_shared::types::{EntryId, Money, TemplateId};
use serde::Serialize;
use thiserror::Error;

use super::period::{PeriodError, PeriodKey};
use super::store::StorageError;
use crate::accounts::DirectoryError;
use crate::workflow::{ReclassificationError, WorkflowError};

/// What is wrong with a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineProblem {
    /// Both a debit and a credit amount are set.
    BothSides,
    /// Neither side is set.
    NoAmount,
    /// The amount is zero.
    ZeroAmount,
    /// The amount is negative.
    NegativeAmount,
    /// The account code is blank.
    BlankAccount,
}

impl fmt::Display for LineProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BothSides => "line must set either a debit or a credit, not both",
            Self::NoAmount => "line must set a debit or a credit amount",
            Self::ZeroAmount => "line amount cannot be zero",
            Self::NegativeAmount => "line amount cannot be negative",
            Self::BlankAccount => "line account code is empty",
        })
    }
}

/// The five validation failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Debits and credits differ.
    Unbalanced,
    /// A line references an unknown account.
    InvalidAccount,
    /// The entry date is outside an open period.
    ClosedPeriod,
    /// Line structure is wrong.
    MalformedLine,
    /// Auto or recurring entry without a source reference.
    MissingSourceReference,
}

/// Why a candidate entry cannot leave draft.
///
/// Line numbers are 1-based so they can be shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fewer than two lines.
    #[error("Entry must have at least 2 lines, found {count}")]
    TooFewLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// A line is malformed.
    #[error("Line {line}: {problem}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// What is wrong.
        problem: LineProblem,
    },

    /// Line totals overflow the amount range.
    #[error("Entry totals overflow at line {line}")]
    AmountOverflow {
        /// 1-based line number where the sum overflowed.
        line: usize,
    },

    /// Debits and credits differ.
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debits.
        debit: Money,
        /// Total credits.
        credit: Money,
    },

    /// A line references an unknown account.
    #[error("Line {line}: account {account_code} does not exist")]
    InvalidAccount {
        /// 1-based line number.
        line: usize,
        /// The unknown code.
        account_code: String,
    },

    /// The entry date is not inside an open period.
    #[error("Period {period} for date {date} is not open")]
    ClosedPeriod {
        /// Entry date.
        date: NaiveDate,
        /// Period the date falls in.
        period: PeriodKey,
    },

    /// Auto or recurring entry lacks `(sourceModule, sourceDocumentId)`.
    #[error("{entry_type} entries require a source module and source document id")]
    MissingSourceReference {
        /// The entry type.
        entry_type: String,
    },
}

impl ValidationError {
    /// The failure kind.
    #[must_use]
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::TooFewLines { .. } | Self::MalformedLine { .. } | Self::AmountOverflow { .. } => {
                ValidationErrorKind::MalformedLine
            }
            Self::Unbalanced { .. } => ValidationErrorKind::Unbalanced,
            Self::InvalidAccount { .. } => ValidationErrorKind::InvalidAccount,
            Self::ClosedPeriod { .. } => ValidationErrorKind::ClosedPeriod,
            Self::MissingSourceReference { .. } => ValidationErrorKind::MissingSourceReference,
        }
    }

    /// The offending line, when the failure is line-level.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line, .. }
            | Self::AmountOverflow { line }
            | Self::InvalidAccount { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Why the posting engine could not commit an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// The period closed between validation and the posting lock.
    #[error("Period {0} closed before the entry could post")]
    PeriodClosedRace(PeriodKey),

    /// A period balance would overflow.
    #[error("Balance overflow on account {account_code} in period {period}")]
    BalanceOverflow {
        /// The period.
        period: PeriodKey,
        /// The account.
        account_code: String,
    },

    /// The entry log or period state could not be written.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<StorageError> for PostingError {
    fn from(err: StorageError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<PeriodError> for PostingError {
    fn from(err: PeriodError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Candidate entry failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The posting engine could not commit.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Workflow transition refused.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Period management refused.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Recurring template not found.
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// Only manual and adjusting entries may be drafted by hand.
    #[error("Entries of type {0} cannot be drafted manually")]
    NotDraftable(String),

    /// Only posted entries can be corrected.
    #[error("Entry {0} is not posted and cannot be corrected")]
    NotCorrectable(EntryId),

    /// The entry already has a correction posted or in flight.
    #[error("Entry {original} is already corrected by {correction}")]
    AlreadyCorrected {
        /// The original entry.
        original: EntryId,
        /// The existing correction.
        correction: EntryId,
    },

    /// Reclassification request is inconsistent with the original entry.
    #[error("Invalid reclassification: {0}")]
    InvalidReclassification(#[from] ReclassificationError),

    /// Replayed balances disagree with the live balance table.
    #[error("Balance drift on account {account_code} in period {period}")]
    BalanceDrift {
        /// The period.
        period: PeriodKey,
        /// The account.
        account_code: String,
    },

    /// Storage could not be read.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<DirectoryError> for LedgerError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(code) => Self::AccountNotFound(code),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => match e.kind() {
                ValidationErrorKind::Unbalanced => "UNBALANCED",
                ValidationErrorKind::InvalidAccount => "INVALID_ACCOUNT",
                ValidationErrorKind::ClosedPeriod => "CLOSED_PERIOD",
                ValidationErrorKind::MalformedLine => "MALFORMED_LINE",
                ValidationErrorKind::MissingSourceReference => "MISSING_SOURCE_REFERENCE",
            },
            Self::Posting(PostingError::PeriodClosedRace(_)) => "PERIOD_CLOSED_RACE",
            Self::Posting(PostingError::BalanceOverflow { .. }) => "BALANCE_OVERFLOW",
            Self::Posting(PostingError::StorageFailure(_)) => "STORAGE_FAILURE",
            Self::Workflow(e) => e.error_code(),
            Self::Period(PeriodError::NotFound(_)) => "PERIOD_NOT_FOUND",
            Self::Period(PeriodError::AlreadyClosed(_)) => "PERIOD_ALREADY_CLOSED",
            Self::Period(PeriodError::LaterPeriodClosed { .. }) => "LATER_PERIOD_CLOSED",
            Self::Period(PeriodError::EarlierPeriodsOpen { .. }) => "EARLIER_PERIODS_OPEN",
            Self::Period(PeriodError::Unavailable(_)) => "PERIOD_UNAVAILABLE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::NotDraftable(_) => "NOT_DRAFTABLE",
            Self::NotCorrectable(_) => "NOT_CORRECTABLE",
            Self::AlreadyCorrected { .. } => "ALREADY_CORRECTED",
            Self::InvalidReclassification(_) => "INVALID_RECLASSIFICATION",
            Self::BalanceDrift { .. } => "BALANCE_DRIFT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the request itself is wrong
            Self::Validation(_)
            | Self::NotDraftable(_)
            | Self::InvalidReclassification(_) => 400,

            Self::Workflow(e) => e.status_code(),

            // 404 Not Found
            Self::EntryNotFound(_)
            | Self::AccountNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::Period(PeriodError::NotFound(_)) => 404,

            // 409 Conflict - state moved underneath the caller
            Self::Posting(PostingError::PeriodClosedRace(_))
            | Self::Period(
                PeriodError::AlreadyClosed(_)
                | PeriodError::LaterPeriodClosed { .. }
                | PeriodError::EarlierPeriodsOpen { .. },
            )
            | Self::NotCorrectable(_)
            | Self::AlreadyCorrected { .. } => 409,

            // 500 Internal Server Error
            Self::Posting(PostingError::BalanceOverflow { .. } | PostingError::StorageFailure(_))
            | Self::Period(PeriodError::Unavailable(_))
            | Self::BalanceDrift { .. }
            | Self::Storage(_) => 500,
        }
    }

    /// Returns true if resubmitting through the same idempotent path may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Posting(PostingError::StorageFailure(_)))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ if err.is_retryable() => Self::Storage(message),
            _ => Self::Internal(message),
        }
    }
}
