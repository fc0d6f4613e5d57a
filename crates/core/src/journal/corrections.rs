//! Corrections of posted entries: full reversals and reclassifications.
//!
//! Both produce an `adjusting` draft that goes through the normal approval
//! workflow. The original only changes once the correction posts, and then
//! only by gaining its `corrected_by` reference.

use dashmap::mapref::entry::Entry;
use journal_shared::types::EntryId;
use tracing::info;

use super::{Journal, ReclassificationRequest, ReversalRequest};
use crate::accounts::AccountDirectory;
use crate::ledger::error::LedgerError;
use crate::ledger::store::EntryLog;
use crate::ledger::types::{EntryStatus, EntryType, JournalEntry};
use crate::workflow::ReversalService;

impl<D: AccountDirectory, L: EntryLog> Journal<D, L> {
    /// Drafts an entry that fully reverses a posted entry.
    pub fn reverse(&self, request: ReversalRequest) -> Result<EntryId, LedgerError> {
        let original = self.correctable(request.original)?;
        let reason = request.reason.trim();

        let mut draft = JournalEntry::new(
            EntryType::Adjusting,
            EntryStatus::Draft,
            request.date,
            ReversalService::reversal_description(&original, reason),
            ReversalService::reversing_lines(&original.lines),
            request.created_by,
        );
        draft.reversal_of = Some(original.id);
        if !reason.is_empty() {
            draft.memo = Some(reason.to_string());
        }
        self.claim_correction(original.id, draft.id)?;
        Ok(self.insert_draft(draft))
    }

    /// Drafts an adjusting entry that moves miscoded lines of a posted entry
    /// to the right accounts.
    pub fn reclassify(&self, request: ReclassificationRequest) -> Result<EntryId, LedgerError> {
        let original = self.correctable(request.original)?;
        let lines = ReversalService::reclassification_lines(&original.lines, &request.corrections)?;

        let mut draft = JournalEntry::new(
            EntryType::Adjusting,
            EntryStatus::Draft,
            request.date,
            ReversalService::reclassification_description(&original),
            lines,
            request.created_by,
        );
        draft.reversal_of = Some(original.id);
        draft.memo = request.memo;
        self.claim_correction(original.id, draft.id)?;
        Ok(self.insert_draft(draft))
    }

    fn correctable(&self, original_id: EntryId) -> Result<JournalEntry, LedgerError> {
        let original = self.get_entry(original_id)?;
        if !original.is_posted() {
            return Err(LedgerError::NotCorrectable(original_id));
        }
        if let Some(correction) = original.corrected_by {
            return Err(LedgerError::AlreadyCorrected {
                original: original_id,
                correction,
            });
        }
        Ok(original)
    }

    /// Atomically records `correction` as the one correction of `original`.
    fn claim_correction(&self, original: EntryId, correction: EntryId) -> Result<(), LedgerError> {
        match self.corrections.entry(original) {
            Entry::Occupied(existing) => Err(LedgerError::AlreadyCorrected {
                original,
                correction: *existing.get(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(correction);
                Ok(())
            }
        }
    }

    /// Frees the claim held by a discarded or rejected correction.
    pub(super) fn release_correction(&self, original: EntryId, correction: EntryId) {
        self.corrections
            .remove_if(&original, |_, holder| *holder == correction);
    }

    /// Points the original at its posted correction.
    pub(super) fn link_correction(&self, original: EntryId, correction: EntryId) {
        if let Some(mut entry) = self.entries.get_mut(&original) {
            entry.corrected_by = Some(correction);
            info!(%original, %correction, "entry corrected");
        }
    }
}
