//! Entry search filters.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::ledger::types::{EntryStatus, EntryType, JournalEntry};

/// Criteria for [`crate::Journal::list_entries`]. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryFilter {
    /// Lifecycle status.
    pub status: Option<EntryStatus>,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    /// Earliest entry date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Only entries with a line on this account.
    pub account_code: Option<String>,
    /// Only entries submitted by this source module.
    pub source_module: Option<String>,
}

impl EntryFilter {
    /// Returns true if the entry satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.status.is_none_or(|s| entry.status == s)
            && self.entry_type.is_none_or(|t| entry.entry_type == t)
            && self.date_from.is_none_or(|d| entry.date >= d)
            && self.date_to.is_none_or(|d| entry.date <= d)
            && self
                .account_code
                .as_deref()
                .is_none_or(|code| entry.touches_account(code))
            && self.source_module.as_deref().is_none_or(|module| {
                entry.source.as_ref().is_some_and(|s| s.module == module)
            })
    }
}

/// Orders entries by date, then posting number, then creation.
pub fn sort_entries(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.entry_number.cmp(&b.entry_number))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}
