//! Idempotency index over `(sourceModule, sourceDocumentId)`.
//!
//! Reservation goes through a single atomic map-entry operation, so two
//! concurrent submissions with the same key can never both reserve it.
//! A key held by a submission that is still posting is unsettled: callers
//! asking about it wait until the holder commits, parks or releases it.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use journal_shared::types::EntryId;

use super::types::SourceKey;

/// Result of [`IdempotencyLedger::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The key is now held by the caller's entry.
    Reserved,
    /// The key already belongs to another entry.
    AlreadyExists(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Reserved while the holder validates and posts. The entry may not
    /// exist yet.
    InFlight(EntryId),
    /// The entry exists and awaits approval.
    Pending(EntryId),
    /// The entry posted.
    Committed(EntryId),
}

impl Slot {
    fn entry_id(self) -> EntryId {
        match self {
            Self::InFlight(id) | Self::Pending(id) | Self::Committed(id) => id,
        }
    }

    fn is_settled(self) -> bool {
        !matches!(self, Self::InFlight(_))
    }
}

/// Unique mapping from source key to entry id across non-rejected entries.
#[derive(Debug, Default)]
pub struct IdempotencyLedger {
    slots: DashMap<SourceKey, Slot>,
    /// Guards the wait on unsettled keys. Holds no data, so a poisoned
    /// guard is still usable.
    gate: Mutex<()>,
    settled: Condvar,
}

impl IdempotencyLedger {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, ()>) -> MutexGuard<'a, ()> {
        self.settled
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wakes every caller waiting on an unsettled key. The slot change must
    /// be visible before this runs.
    fn notify(&self) {
        let _gate = self.lock_gate();
        self.settled.notify_all();
    }

    /// The entry holding `key` once it is settled, or `None` if the key is
    /// free. Blocks while the holder is still posting.
    pub fn lookup(&self, key: &SourceKey) -> Option<EntryId> {
        let mut gate = self.lock_gate();
        loop {
            let slot = self.slots.get(key).map(|s| *s);
            match slot {
                None => return None,
                Some(slot) if slot.is_settled() => return Some(slot.entry_id()),
                Some(_) => gate = self.wait(gate),
            }
        }
    }

    /// Atomically claims `key` for `entry_id`.
    ///
    /// If another submission holds the key but has not settled it yet, this
    /// waits for that outcome: a commit or park yields
    /// [`Reservation::AlreadyExists`], a release lets the caller reserve.
    pub fn reserve(&self, key: SourceKey, entry_id: EntryId) -> Reservation {
        let mut gate = self.lock_gate();
        loop {
            let holder = match self.slots.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Slot::InFlight(entry_id));
                    return Reservation::Reserved;
                }
                Entry::Occupied(existing) => *existing.get(),
            };
            if holder.is_settled() {
                return Reservation::AlreadyExists(holder.entry_id());
            }
            gate = self.wait(gate);
        }
    }

    /// Marks the in-flight reservation of `entry_id` as awaiting approval.
    /// The entry must already be visible to readers.
    pub fn park(&self, key: &SourceKey, entry_id: EntryId) {
        self.transition(key, entry_id, Slot::Pending(entry_id));
    }

    /// Marks the reservation held by `entry_id` as committed.
    pub fn commit(&self, key: &SourceKey, entry_id: EntryId) {
        self.transition(key, entry_id, Slot::Committed(entry_id));
    }

    fn transition(&self, key: &SourceKey, entry_id: EntryId, next: Slot) {
        if let Some(mut slot) = self.slots.get_mut(key) {
            if slot.entry_id() == entry_id {
                *slot = next;
            }
        }
        self.notify();
    }

    /// Frees a reservation that never committed, or one whose entry was
    /// rejected. Only the holder can release its own key.
    pub fn release(&self, key: &SourceKey, entry_id: EntryId) -> bool {
        let released = self
            .slots
            .remove_if(key, |_, slot| slot.entry_id() == entry_id)
            .is_some();
        self.notify();
        released
    }

    /// Returns true if `key` is committed to a posted entry.
    #[must_use]
    pub fn is_committed(&self, key: &SourceKey) -> bool {
        self.slots
            .get(key)
            .is_some_and(|s| matches!(*s, Slot::Committed(_)))
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no key is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
