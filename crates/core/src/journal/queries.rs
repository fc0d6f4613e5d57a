//! Query/projection contract.
//!
//! Reads never take the posting lock for longer than a balance snapshot, so
//! they do not hold up posting.

use journal_shared::types::EntryId;
use tracing::{error, info};

use super::Journal;
use crate::accounts::{Account, AccountDirectory};
use crate::ledger::balance::{PeriodBalances, replay};
use crate::ledger::error::LedgerError;
use crate::ledger::period::{PeriodError, PeriodKey};
use crate::ledger::store::EntryLog;
use crate::ledger::types::JournalEntry;
use crate::query::{AccountLedger, EntryFilter, TrialBalance, sort_entries};

impl<D: AccountDirectory, L: EntryLog> Journal<D, L> {
    /// An entry by id.
    pub fn get_entry(&self, entry_id: EntryId) -> Result<JournalEntry, LedgerError> {
        self.entries
            .get(&entry_id)
            .map(|e| e.clone())
            .ok_or(LedgerError::EntryNotFound(entry_id))
    }

    /// Entries matching the filter, ordered by date then posting number.
    pub fn list_entries(&self, filter: &EntryFilter) -> Vec<JournalEntry> {
        let mut matching: Vec<_> = self
            .entries
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        sort_entries(&mut matching);
        matching
    }

    /// Every account in the directory.
    pub fn accounts(&self) -> Vec<Account> {
        self.directory.accounts()
    }

    /// Debit and credit totals by account for a period.
    pub fn trial_balance(&self, period: PeriodKey) -> Result<TrialBalance, LedgerError> {
        let book = self
            .periods
            .book(period)
            .ok_or(PeriodError::NotFound(period))?;
        let balances = book.balances_snapshot()?;
        Ok(TrialBalance::build(
            period,
            book.status(),
            &balances,
            &self.directory,
        ))
    }

    /// One account's postings in a period with a running balance carried in
    /// from earlier periods.
    pub fn account_ledger(
        &self,
        account_code: &str,
        period: PeriodKey,
    ) -> Result<AccountLedger, LedgerError> {
        let account = self.directory.resolve(account_code)?;
        if self.periods.book(period).is_none() {
            return Err(PeriodError::NotFound(period).into());
        }

        let mut prior = Vec::new();
        for key in self.periods.keys().into_iter().filter(|k| *k < period) {
            if let Some(book) = self.periods.book(key)
                && let Some(totals) = book.balances_snapshot()?.get(account_code).copied()
            {
                prior.push(totals);
            }
        }
        let posted = self.engine.log().posted_in(period)?;
        Ok(AccountLedger::build(&account, period, prior, &posted))
    }

    /// Replays the entry log and compares it with the live balance table.
    ///
    /// Each period is checked under its posting lock, so concurrent posts
    /// cannot produce false drift.
    pub fn verify_balances(&self) -> Result<(), LedgerError> {
        for period in self.periods.keys() {
            let Some(book) = self.periods.book(period) else {
                continue;
            };
            let ledger = book.lock()?;
            let posted = self.engine.log().posted_in(period)?;
            let replayed = replay(&posted)?
                .remove(&period)
                .unwrap_or_default();
            if let Some(account_code) = first_difference(ledger.balances(), &replayed) {
                error!(%period, %account_code, "balance drift detected");
                return Err(LedgerError::BalanceDrift {
                    period,
                    account_code,
                });
            }
        }
        info!("balances verified against entry log");
        Ok(())
    }
}

fn first_difference(live: &PeriodBalances, replayed: &PeriodBalances) -> Option<String> {
    live.keys()
        .chain(replayed.keys())
        .find(|code| live.get(*code) != replayed.get(*code))
        .cloned()
}
