//! Accounting periods and the per-period posting books.
//!
//! Every period owns one [`PeriodBook`]: its open/closed status, the
//! entry-number counter and the running per-account totals. The book's
//! posting mutex is the ledger's only serialization point, and it is scoped
//! to a single period.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{Datelike, NaiveDate};
use dashmap::DashMap;
use journal_shared::types::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A calendar-month accounting period, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

/// Error parsing a period key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid period key '{0}', expected YYYY-MM")]
pub struct PeriodKeyError(pub String);

impl PeriodKey {
    /// Creates a key, returning `None` for an invalid month.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The period a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the period.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the period.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following period.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Signed number of months from `other` to `self`.
    #[must_use]
    pub fn months_since(&self, other: &Self) -> i64 {
        (i64::from(self.year) - i64::from(other.year)) * 12
            + (i64::from(self.month) - i64::from(other.month))
    }

    /// Returns true if the date falls within this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    /// Compact form used in entry numbers (`YYYYMM`).
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodKeyError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(value: PeriodKey) -> Self {
        value.to_string()
    }
}

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Entries dated in the period can be posted.
    Open,
    /// The period is immutable.
    Closed,
}

impl PeriodStatus {
    /// Returns true if the period accepts postings.
    #[must_use]
    pub fn allows_posting(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Debit and credit totals for one account in one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// Sum of debit postings.
    pub debit_total: Money,
    /// Sum of credit postings.
    pub credit_total: Money,
}

impl AccountTotals {
    /// Debit total minus credit total.
    #[must_use]
    pub fn net_debit(&self) -> Money {
        self.debit_total.saturating_sub(self.credit_total)
    }
}

/// State mutated only while the period's posting lock is held.
#[derive(Debug)]
pub struct PeriodLedger {
    /// Sequence the next posted entry receives.
    pub(crate) next_sequence: u64,
    /// Per-account running totals.
    pub(crate) balances: BTreeMap<String, AccountTotals>,
}

impl PeriodLedger {
    /// Number of entries posted to the period.
    #[must_use]
    pub fn posted_count(&self) -> u64 {
        self.next_sequence.saturating_sub(1)
    }

    /// Running totals by account code.
    #[must_use]
    pub fn balances(&self) -> &BTreeMap<String, AccountTotals> {
        &self.balances
    }
}

/// One accounting period's status, counter and balances.
#[derive(Debug)]
pub struct PeriodBook {
    key: PeriodKey,
    status: RwLock<PeriodStatus>,
    ledger: Mutex<PeriodLedger>,
}

impl PeriodBook {
    fn open(key: PeriodKey) -> Self {
        Self {
            key,
            status: RwLock::new(PeriodStatus::Open),
            ledger: Mutex::new(PeriodLedger {
                next_sequence: 1,
                balances: BTreeMap::new(),
            }),
        }
    }

    /// The period this book belongs to.
    #[must_use]
    pub fn key(&self) -> PeriodKey {
        self.key
    }

    /// Current status. A poisoned status lock reads as closed.
    #[must_use]
    pub fn status(&self) -> PeriodStatus {
        self.status
            .read()
            .map(|s| *s)
            .unwrap_or(PeriodStatus::Closed)
    }

    /// Acquires the posting lock.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, PeriodLedger>, PeriodError> {
        self.ledger
            .lock()
            .map_err(|_| PeriodError::Unavailable(self.key))
    }

    /// Snapshot of the running totals, taken under the posting lock.
    pub fn balances_snapshot(&self) -> Result<BTreeMap<String, AccountTotals>, PeriodError> {
        Ok(self.lock()?.balances.clone())
    }

    fn set_status(&self, status: PeriodStatus) -> Result<(), PeriodError> {
        let mut guard = self
            .status
            .write()
            .map_err(|_| PeriodError::Unavailable(self.key))?;
        *guard = status;
        Ok(())
    }
}

/// Errors from period management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The period was never opened.
    #[error("Period {0} not found")]
    NotFound(PeriodKey),

    /// Closed periods are immutable and cannot be reopened.
    #[error("Period {0} is closed and cannot be reopened")]
    AlreadyClosed(PeriodKey),

    /// A later period has already been closed.
    #[error("Cannot open period {period}: later period {closed} is already closed")]
    LaterPeriodClosed {
        /// The period being opened.
        period: PeriodKey,
        /// The closed later period.
        closed: PeriodKey,
    },

    /// An earlier period is still open.
    #[error("Cannot close period {period}: earlier period {open} is still open")]
    EarlierPeriodsOpen {
        /// The period being closed.
        period: PeriodKey,
        /// The first earlier period still open.
        open: PeriodKey,
    },

    /// The period's locks are poisoned.
    #[error("Period {0} is unavailable")]
    Unavailable(PeriodKey),
}

/// Result of [`PeriodRegistry::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenOutcome {
    /// The period was opened by this call.
    Opened,
    /// The period was already open.
    AlreadyOpen,
}

/// Registry of every period the ledger knows about.
#[derive(Debug, Default)]
pub struct PeriodRegistry {
    books: DashMap<PeriodKey, Arc<PeriodBook>>,
}

impl PeriodRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a period.
    pub fn open(&self, key: PeriodKey) -> Result<OpenOutcome, PeriodError> {
        if let Some(closed) = self
            .keys()
            .into_iter()
            .filter(|k| *k > key)
            .find(|k| self.status(*k) == Some(PeriodStatus::Closed))
        {
            return Err(PeriodError::LaterPeriodClosed {
                period: key,
                closed,
            });
        }

        let mut outcome = OpenOutcome::AlreadyOpen;
        let book = self
            .books
            .entry(key)
            .or_insert_with(|| {
                outcome = OpenOutcome::Opened;
                Arc::new(PeriodBook::open(key))
            })
            .clone();

        if book.status() == PeriodStatus::Closed {
            return Err(PeriodError::AlreadyClosed(key));
        }
        Ok(outcome)
    }

    /// Closes a period.
    ///
    /// The posting lock is held while the status flips, so a close never
    /// lands between a post's re-check and its commit.
    pub fn close(&self, key: PeriodKey) -> Result<(), PeriodError> {
        let book = self.book(key).ok_or(PeriodError::NotFound(key))?;
        if let Some(open) = self
            .keys()
            .into_iter()
            .filter(|k| *k < key)
            .find(|k| self.status(*k) == Some(PeriodStatus::Open))
        {
            return Err(PeriodError::EarlierPeriodsOpen { period: key, open });
        }

        let _posting = book.lock()?;
        book.set_status(PeriodStatus::Closed)
    }

    /// Status of a period, `None` if it was never opened.
    #[must_use]
    pub fn status(&self, key: PeriodKey) -> Option<PeriodStatus> {
        self.books.get(&key).map(|b| b.status())
    }

    /// Returns true if entries dated in the period may be posted.
    #[must_use]
    pub fn is_open(&self, key: PeriodKey) -> bool {
        self.status(key).is_some_and(|s| s.allows_posting())
    }

    /// The book for a period.
    #[must_use]
    pub fn book(&self, key: PeriodKey) -> Option<Arc<PeriodBook>> {
        self.books.get(&key).map(|b| Arc::clone(b.value()))
    }

    /// Every known period, ascending.
    #[must_use]
    pub fn keys(&self) -> Vec<PeriodKey> {
        let mut keys: Vec<_> = self.books.iter().map(|b| *b.key()).collect();
        keys.sort_unstable();
        keys
    }
}
