//! Source Module Adapter: idempotent submission from upstream modules and
//! recurring materialization.

use chrono::Utc;
use tracing::{info, warn};

use super::{Journal, MaterializedInstance, SourceSubmission, SubmitOutcome};
use crate::accounts::AccountDirectory;
use crate::ledger::error::LedgerError;
use crate::ledger::idempotency::Reservation;
use crate::ledger::period::PeriodKey;
use crate::ledger::store::EntryLog;
use crate::ledger::types::{EntryStatus, EntryType, JournalEntry, SYSTEM_USER, SourceKey};
use crate::recurring::RecurringTemplate;

impl<D: AccountDirectory, L: EntryLog> Journal<D, L> {
    /// Submits an auto entry from a source module.
    ///
    /// A key that is already held returns the holder's id without looking at
    /// the payload, so re-delivery of the same document is always safe. If
    /// the holder is still posting, the call waits for it: a failed post
    /// frees the key and this submission takes it over.
    pub fn submit(&self, submission: SourceSubmission) -> Result<SubmitOutcome, LedgerError> {
        let key = SourceKey::new(
            submission.source_module.trim(),
            submission.source_document_id.trim(),
        );
        if let Some(existing) = self.duplicate_of(&key) {
            return Ok(existing);
        }

        let description = submission
            .description
            .unwrap_or_else(|| format!("{} {}", key.module, key.document_id));
        let mut entry = JournalEntry::new(
            EntryType::Auto,
            EntryStatus::Draft,
            submission.date,
            description,
            submission.lines,
            SYSTEM_USER,
        );
        entry.memo = submission.memo;
        entry.source = Some(key);
        self.post_sourced(entry)
    }

    fn duplicate_of(&self, key: &SourceKey) -> Option<SubmitOutcome> {
        if key.is_blank() {
            return None;
        }
        let entry_id = self.idempotency.lookup(key)?;
        warn!(source = %key, %entry_id, "duplicate source submission");
        Some(SubmitOutcome {
            entry_id,
            duplicate: true,
            entry_number: self.entries.get(&entry_id).and_then(|e| e.entry_number),
        })
    }

    /// Validates, reserves the source key and posts without approval.
    fn post_sourced(&self, entry: JournalEntry) -> Result<SubmitOutcome, LedgerError> {
        let validated = self.validator().validate(&entry)?;
        let Some(key) = entry.source.clone() else {
            return Err(LedgerError::Storage("validated entry lost its source".into()));
        };

        if let Reservation::AlreadyExists(existing) = self.idempotency.reserve(key.clone(), entry.id)
        {
            warn!(source = %key, entry_id = %existing, "source key taken concurrently");
            return Ok(SubmitOutcome {
                entry_id: existing,
                duplicate: true,
                entry_number: self.entries.get(&existing).and_then(|e| e.entry_number),
            });
        }

        match self.engine.post(validated, None) {
            Ok(posted) => {
                let outcome = SubmitOutcome {
                    entry_id: posted.id,
                    duplicate: false,
                    entry_number: posted.entry_number,
                };
                self.entries.insert(posted.id, posted);
                self.idempotency.commit(&key, outcome.entry_id);
                Ok(outcome)
            }
            Err(err) => {
                self.idempotency.release(&key, entry.id);
                Err(err.into())
            }
        }
    }

    /// Validates, reserves the source key and queues the entry for approval.
    fn queue_sourced(&self, mut entry: JournalEntry) -> Result<SubmitOutcome, LedgerError> {
        self.validator().validate(&entry)?;
        let Some(key) = entry.source.clone() else {
            return Err(LedgerError::Storage("validated entry lost its source".into()));
        };

        if let Reservation::AlreadyExists(existing) = self.idempotency.reserve(key.clone(), entry.id)
        {
            return Ok(SubmitOutcome {
                entry_id: existing,
                duplicate: true,
                entry_number: None,
            });
        }

        entry.status = EntryStatus::PendingApproval;
        entry.submitted_at = Some(Utc::now());
        let entry_id = entry.id;
        self.entries.insert(entry_id, entry);
        self.idempotency.park(&key, entry_id);
        Ok(SubmitOutcome {
            entry_id,
            duplicate: false,
            entry_number: None,
        })
    }

    /// Materializes one template instance for `period`.
    pub(super) fn materialize(
        &self,
        template: &RecurringTemplate,
        period: PeriodKey,
    ) -> Result<MaterializedInstance, LedgerError> {
        let entry = template.instantiate(period);
        let outcome = if let Some(existing) = self.duplicate_of(&template.source_key(period)) {
            existing
        } else if template.autopost {
            self.post_sourced(entry)?
        } else {
            self.queue_sourced(entry)?
        };

        let status = self
            .entries
            .get(&outcome.entry_id)
            .map_or(EntryStatus::PendingApproval, |e| e.status);
        if !outcome.duplicate {
            info!(
                template_id = %template.id,
                entry_id = %outcome.entry_id,
                %period,
                %status,
                "recurring entry materialized"
            );
        }
        Ok(MaterializedInstance {
            template_id: template.id,
            entry_id: outcome.entry_id,
            status,
            duplicate: outcome.duplicate,
        })
    }
}
