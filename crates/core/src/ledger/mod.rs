//! Double-entry journal ledger.
//!
//! This module implements the core ledger functionality:
//! - Entry and line domain types
//! - Structural and semantic validation
//! - Accounting periods and their posting books
//! - The idempotency index for source-module submissions
//! - The posting engine and the append-only entry log
//! - Balance staging and replay

pub mod balance;
pub mod error;
pub mod idempotency;
pub mod period;
pub mod posting;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod posting_props;
#[cfg(test)]
mod validation_props;

pub use balance::{BalanceTable, PeriodBalances, RunningBalance, replay};
pub use error::{LedgerError, LineProblem, PostingError, ValidationError, ValidationErrorKind};
pub use idempotency::{IdempotencyLedger, Reservation};
pub use period::{
    AccountTotals, OpenOutcome, PeriodBook, PeriodError, PeriodKey, PeriodKeyError,
    PeriodRegistry, PeriodStatus,
};
pub use posting::PostingEngine;
pub use store::{EntryLog, InMemoryEntryLog, StorageError};
pub use types::{
    EntryNumber, EntryStatus, EntryTotals, EntryType, JournalEntry, JournalLine, SYSTEM_USER,
    Side, SourceKey,
};
pub use validation::{EntryValidator, ValidatedEntry};
