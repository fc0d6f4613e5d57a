//! The posting engine.
//!
//! Posting runs under the period's posting mutex:
//! 1. lock the period book
//! 2. re-check the period is still open
//! 3. take the next sequence number
//! 4. stage the balance changes
//! 5. append to the entry log
//! 6. apply balances and advance the counter
//!
//! Nothing in the book changes until the log append succeeds, so a failure
//! at any step leaves neither a burnt number nor an unlogged balance.

use std::sync::Arc;

use chrono::Utc;
use journal_shared::types::UserId;
use tracing::{info, warn};

use super::balance::stage_deltas;
use super::error::PostingError;
use super::period::PeriodRegistry;
use super::store::EntryLog;
use super::types::{EntryNumber, EntryStatus, JournalEntry};
use super::validation::ValidatedEntry;

/// Applies validated entries to period balances and the entry log.
#[derive(Debug)]
pub struct PostingEngine<L> {
    periods: Arc<PeriodRegistry>,
    log: L,
}

impl<L: EntryLog> PostingEngine<L> {
    /// Creates an engine over a period registry and an entry log.
    pub fn new(periods: Arc<PeriodRegistry>, log: L) -> Self {
        Self { periods, log }
    }

    /// The period registry.
    pub fn periods(&self) -> &PeriodRegistry {
        &self.periods
    }

    /// The entry log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Posts a validated entry, returning the posted record.
    ///
    /// `approver` is recorded for entries that went through approval.
    pub fn post(
        &self,
        validated: ValidatedEntry,
        approver: Option<UserId>,
    ) -> Result<JournalEntry, PostingError> {
        let period = validated.period();
        let book = self
            .periods
            .book(period)
            .ok_or(PostingError::PeriodClosedRace(period))?;

        let mut ledger = book.lock()?;
        if !book.status().allows_posting() {
            warn!(%period, entry_id = %validated.entry().id, "period closed before posting");
            return Err(PostingError::PeriodClosedRace(period));
        }

        let entry_number = EntryNumber {
            period,
            sequence: ledger.next_sequence,
        };
        let mut posted = validated.into_entry();
        posted.entry_number = Some(entry_number);
        posted.status = EntryStatus::Posted;
        posted.approver = approver;
        posted.posted_at = Some(Utc::now());

        let staged = stage_deltas(period, &ledger.balances, &posted.lines)?;

        if let Err(err) = self.log.append(&posted) {
            warn!(%period, entry_id = %posted.id, error = %err, "entry log append failed");
            return Err(err.into());
        }

        ledger.balances.extend(staged);
        ledger.next_sequence += 1;
        drop(ledger);

        info!(
            entry_id = %posted.id,
            entry_number = %entry_number,
            entry_type = %posted.entry_type,
            "entry posted"
        );
        Ok(posted)
    }
}
