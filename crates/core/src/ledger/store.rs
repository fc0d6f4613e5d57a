//! Append-only log of posted entries.
//!
//! The log is the system of record. Period balances are derived from it and
//! can be rebuilt by replay (see [`super::balance::replay`]).

use std::sync::RwLock;

use thiserror::Error;

use super::period::PeriodKey;
use super::types::JournalEntry;

/// Errors reading or writing the entry log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The log rejected the write.
    #[error("Append failed: {0}")]
    AppendFailed(String),

    /// The log could not be read.
    #[error("Read failed: {0}")]
    ReadFailed(String),
}

/// Append-only storage for posted entries.
pub trait EntryLog: Send + Sync {
    /// Appends a posted entry. Must either store the whole record or nothing.
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    /// Posted entries dated in `period`, in posting order.
    fn posted_in(&self, period: PeriodKey) -> Result<Vec<JournalEntry>, StorageError>;

    /// Every posted entry, in append order.
    fn all(&self) -> Result<Vec<JournalEntry>, StorageError>;
}

/// In-process entry log.
#[derive(Debug, Default)]
pub struct InMemoryEntryLog {
    records: RwLock<Vec<JournalEntry>>,
}

impl InMemoryEntryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryLog for InMemoryEntryLog {
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        self.records
            .write()
            .map_err(|_| StorageError::AppendFailed("log lock poisoned".to_string()))?
            .push(entry.clone());
        Ok(())
    }

    fn posted_in(&self, period: PeriodKey) -> Result<Vec<JournalEntry>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::ReadFailed("log lock poisoned".to_string()))?;
        let mut entries: Vec<_> = records
            .iter()
            .filter(|e| e.period() == period)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.entry_number);
        Ok(entries)
    }

    fn all(&self) -> Result<Vec<JournalEntry>, StorageError> {
        self.records
            .read()
            .map(|r| r.clone())
            .map_err(|_| StorageError::ReadFailed("log lock poisoned".to_string()))
    }
}

impl<L: EntryLog + ?Sized> EntryLog for std::sync::Arc<L> {
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        (**self).append(entry)
    }

    fn posted_in(&self, period: PeriodKey) -> Result<Vec<JournalEntry>, StorageError> {
        (**self).posted_in(period)
    }

    fn all(&self) -> Result<Vec<JournalEntry>, StorageError> {
        (**self).all()
    }
}
