//! Read-side projections built from posted entries.
//!
//! - `filter` - Entry search criteria
//! - `trial_balance` - Per-period debit/credit totals by account
//! - `account_ledger` - One account's postings with a running balance

pub mod account_ledger;
pub mod filter;
pub mod trial_balance;

pub use account_ledger::{AccountLedger, AccountLedgerLine};
pub use filter::{EntryFilter, sort_entries};
pub use trial_balance::{TrialBalance, TrialBalanceRow};
