//! Manual entry contract: drafts and the approval workflow.

use dashmap::DashSet;
use dashmap::mapref::entry::Entry;
use journal_shared::types::{EntryId, UserId};
use tracing::{info, warn};

use super::{DraftInput, DraftUpdate, Journal};
use crate::accounts::AccountDirectory;
use crate::ledger::error::LedgerError;
use crate::ledger::store::EntryLog;
use crate::ledger::types::{EntryStatus, EntryTotals, EntryType, JournalEntry};
use crate::workflow::{Approver, TransitionDenied, WorkflowError, WorkflowService};

impl<D: AccountDirectory, L: EntryLog> Journal<D, L> {
    /// Creates a draft. Drafts are not validated until they are submitted.
    pub fn create_draft(&self, input: DraftInput) -> Result<EntryId, LedgerError> {
        if !matches!(input.entry_type, EntryType::Manual | EntryType::Adjusting) {
            return Err(LedgerError::NotDraftable(input.entry_type.to_string()));
        }
        let mut entry = JournalEntry::new(
            input.entry_type,
            EntryStatus::Draft,
            input.date,
            input.description,
            input.lines,
            input.created_by,
        );
        entry.memo = input.memo;
        Ok(self.insert_draft(entry))
    }

    pub(super) fn insert_draft(&self, entry: JournalEntry) -> EntryId {
        let entry_id = entry.id;
        info!(
            %entry_id,
            entry_type = %entry.entry_type,
            created_by = %entry.created_by,
            "draft created"
        );
        self.entries.insert(entry_id, entry);
        entry_id
    }

    /// Edits a draft. Only the creator may edit.
    pub fn update_draft(
        &self,
        entry_id: EntryId,
        user: UserId,
        update: DraftUpdate,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self
            .entries
            .get_mut(&entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        WorkflowService::check_draft_owner(&entry, user)?;

        if let Some(date) = update.date {
            entry.date = date;
        }
        if let Some(description) = update.description {
            entry.description = description;
        }
        if let Some(lines) = update.lines {
            entry.lines = lines;
        }
        if let Some(memo) = update.memo {
            entry.memo = Some(memo);
        }
        Ok(entry.clone())
    }

    /// Discards a draft. Nothing was posted, so nothing else changes.
    pub fn discard_draft(&self, entry_id: EntryId, user: UserId) -> Result<(), LedgerError> {
        let removed = match self.entries.entry(entry_id) {
            Entry::Vacant(_) => return Err(LedgerError::EntryNotFound(entry_id)),
            Entry::Occupied(slot) => {
                WorkflowService::check_draft_owner(slot.get(), user)?;
                slot.remove()
            }
        };
        if let Some(original) = removed.reversal_of {
            self.release_correction(original, entry_id);
        }
        info!(%entry_id, "draft discarded");
        Ok(())
    }

    /// Runs the validator over a stored entry without changing it.
    pub fn validate_entry(&self, entry_id: EntryId) -> Result<EntryTotals, LedgerError> {
        let entry = self.get_entry(entry_id)?;
        Ok(self.validator().validate(&entry)?.totals())
    }

    /// Moves a valid draft to pending approval.
    pub fn submit_for_approval(
        &self,
        entry_id: EntryId,
        submitted_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self
            .entries
            .get_mut(&entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let action = WorkflowService::submit(entry.status, submitted_by)?;
        WorkflowService::check_draft_owner(&entry, submitted_by)?;
        if let Err(err) = self.validator().validate(&entry) {
            warn!(%entry_id, error = %err, "draft failed validation on submit");
            return Err(err.into());
        }

        action.apply(&mut entry);
        info!(%entry_id, "entry submitted for approval");
        Ok(entry.clone())
    }

    /// Approves a pending entry and posts it.
    ///
    /// The entry is claimed for posting under a short table lock, then
    /// posted with no table lock held, so readers never wait on the period
    /// lock. A second approver arriving while the claim is held gets an
    /// `InvalidTransition`. If posting fails the entry stays pending.
    pub fn approve(&self, entry_id: EntryId, approver: &Approver) -> Result<JournalEntry, LedgerError> {
        let candidate = self.get_entry(entry_id)?;
        WorkflowService::approve(&candidate, approver)?;
        let validated = self.validator().validate(&candidate)?;
        let _claim = self.claim_for_posting(entry_id, approver)?;

        let posted = match self.engine.post(validated, Some(approver.user_id())) {
            Ok(posted) => posted,
            Err(err) => {
                warn!(%entry_id, error = %err, "approved entry failed to post");
                return Err(err.into());
            }
        };
        self.entries.insert(entry_id, posted.clone());

        if let Some(key) = &posted.source {
            self.idempotency.commit(key, entry_id);
        }
        if let Some(original) = posted.reversal_of {
            self.link_correction(original, entry_id);
        }
        info!(%entry_id, approver = %approver.user_id(), "entry approved");
        Ok(posted)
    }

    /// Marks a pending entry as being posted. The status is re-checked under
    /// the table lock, since another approval may have finished since the
    /// caller read it.
    fn claim_for_posting(
        &self,
        entry_id: EntryId,
        approver: &Approver,
    ) -> Result<PostingClaim<'_>, LedgerError> {
        let slot = self
            .entries
            .get(&entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        WorkflowService::approve(&slot, approver)?;
        if !self.posting.insert(entry_id) {
            return Err(in_progress(slot.status, EntryStatus::Posted).into());
        }
        Ok(PostingClaim {
            posting: &self.posting,
            entry_id,
        })
    }

    /// Rejects a pending entry. Terminal.
    ///
    /// A rejected entry gives up its source key and any correction claim, so
    /// the instance or correction can be created again.
    pub fn reject(
        &self,
        entry_id: EntryId,
        approver: &Approver,
        reason: &str,
    ) -> Result<JournalEntry, LedgerError> {
        let mut slot = self
            .entries
            .get_mut(&entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let action = WorkflowService::reject(slot.status, approver, reason)?;
        if self.posting.contains(&entry_id) {
            return Err(in_progress(slot.status, EntryStatus::Rejected).into());
        }
        action.apply(&mut slot);
        let rejected = slot.clone();
        drop(slot);

        if let Some(key) = &rejected.source {
            self.idempotency.release(key, entry_id);
        }
        if let Some(original) = rejected.reversal_of {
            self.release_correction(original, entry_id);
        }
        info!(%entry_id, approver = %approver.user_id(), "entry rejected");
        Ok(rejected)
    }
}

/// Holds an entry's posting claim; released on drop, after the posted
/// record is written back.
struct PostingClaim<'a> {
    posting: &'a DashSet<EntryId>,
    entry_id: EntryId,
}

impl Drop for PostingClaim<'_> {
    fn drop(&mut self) {
        self.posting.remove(&self.entry_id);
    }
}

fn in_progress(from: EntryStatus, to: EntryStatus) -> WorkflowError {
    WorkflowError::InvalidTransition {
        from,
        to,
        reason: TransitionDenied::InProgress,
    }
}
