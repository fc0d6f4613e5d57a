//! The journal: one ledger instance.
//!
//! [`Journal`] wires the account directory, period registry, posting engine,
//! idempotency index, recurring scheduler and the working entry table
//! together and exposes the source-module, manual-entry, correction and
//! query contracts.
//!
//! Entries live in a concurrent table keyed by id. Only the posting engine
//! writes balances and the entry log, always under the period lock.

mod corrections;
mod inputs;
mod manual;
mod queries;
mod source;

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use journal_shared::types::{EntryId, TemplateId};
use tracing::{info, warn};

pub use inputs::{
    DraftInput, DraftUpdate, MaterializedInstance, PeriodOpenReport, ReclassificationRequest,
    ReversalRequest, SourceSubmission, SubmitOutcome, TemplateFailure,
};

use crate::accounts::{AccountDirectory, InMemoryAccountDirectory};
use crate::ledger::error::LedgerError;
use crate::ledger::idempotency::IdempotencyLedger;
use crate::ledger::period::{PeriodKey, PeriodRegistry, PeriodStatus};
use crate::ledger::posting::PostingEngine;
use crate::ledger::store::{EntryLog, InMemoryEntryLog};
use crate::ledger::types::JournalEntry;
use crate::ledger::validation::EntryValidator;
use crate::recurring::{RecurringScheduler, RecurringTemplate};

/// A double-entry journal ledger.
#[derive(Debug)]
pub struct Journal<D = InMemoryAccountDirectory, L = InMemoryEntryLog> {
    directory: D,
    periods: Arc<PeriodRegistry>,
    engine: PostingEngine<L>,
    entries: DashMap<EntryId, JournalEntry>,
    /// Pending entries an approver is currently posting.
    posting: DashSet<EntryId>,
    idempotency: IdempotencyLedger,
    /// Original entry id to the correction claiming it.
    corrections: DashMap<EntryId, EntryId>,
    scheduler: RecurringScheduler,
}

impl<D: AccountDirectory> Journal<D, InMemoryEntryLog> {
    /// Creates a journal with an in-memory entry log.
    pub fn new(directory: D) -> Self {
        Self::with_log(directory, InMemoryEntryLog::new())
    }
}

impl<D: AccountDirectory, L: EntryLog> Journal<D, L> {
    /// Creates a journal over the given entry log.
    pub fn with_log(directory: D, log: L) -> Self {
        let periods = Arc::new(PeriodRegistry::new());
        Self {
            directory,
            engine: PostingEngine::new(Arc::clone(&periods), log),
            periods,
            entries: DashMap::new(),
            posting: DashSet::new(),
            idempotency: IdempotencyLedger::new(),
            corrections: DashMap::new(),
            scheduler: RecurringScheduler::new(),
        }
    }

    /// The account directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// The entry log.
    pub fn log(&self) -> &L {
        self.engine.log()
    }

    fn validator(&self) -> EntryValidator<'_> {
        EntryValidator::new(&self.directory, &self.periods)
    }

    /// Opens a period and materializes the recurring templates due in it.
    ///
    /// Opening an already open period re-runs the scheduler; instances that
    /// already exist are reported as duplicates, so the call is safe to
    /// repeat after a failed materialization.
    pub fn open_period(&self, period: PeriodKey) -> Result<PeriodOpenReport, LedgerError> {
        let outcome = self.periods.open(period)?;
        info!(%period, ?outcome, "period opened");

        let mut report = PeriodOpenReport {
            period,
            outcome,
            materialized: Vec::new(),
            failures: Vec::new(),
        };
        for template in self.scheduler.due_for(period) {
            match self.materialize(&template, period) {
                Ok(instance) => report.materialized.push(instance),
                Err(err) => {
                    warn!(
                        template_id = %template.id,
                        %period,
                        error = %err,
                        "recurring template failed to materialize"
                    );
                    report.failures.push(TemplateFailure {
                        template_id: template.id,
                        name: template.name.clone(),
                        error_code: err.error_code().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Closes a period. Earlier periods must be closed first.
    pub fn close_period(&self, period: PeriodKey) -> Result<(), LedgerError> {
        self.periods.close(period)?;
        info!(%period, "period closed");
        Ok(())
    }

    /// Status of every known period, ascending.
    pub fn periods(&self) -> Vec<(PeriodKey, PeriodStatus)> {
        self.periods
            .keys()
            .into_iter()
            .filter_map(|k| self.periods.status(k).map(|s| (k, s)))
            .collect()
    }

    /// Registers a recurring template.
    pub fn register_template(&self, template: RecurringTemplate) -> Result<TemplateId, LedgerError> {
        Ok(self.scheduler.register(template)?)
    }

    /// Stops a template from firing again.
    pub fn deactivate_template(&self, id: TemplateId) -> Result<(), LedgerError> {
        self.scheduler.deactivate(id)
    }

    /// A registered template.
    pub fn template(&self, id: TemplateId) -> Result<RecurringTemplate, LedgerError> {
        self.scheduler
            .get(id)
            .ok_or(LedgerError::TemplateNotFound(id))
    }

    /// Every registered template.
    pub fn templates(&self) -> Vec<RecurringTemplate> {
        self.scheduler.templates()
    }
}
