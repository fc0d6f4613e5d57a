//! Double-entry journal engine.
//!
//! This crate contains the ledger core with ZERO web dependencies.
//! Entry validation, posting, the approval workflow, recurring entries and
//! read-side projections all live here.
//!
//! # Modules
//!
//! - `accounts` - Chart-of-accounts lookup
//! - `ledger` - Entries, validation, periods, posting and idempotency
//! - `workflow` - Approval state machine and corrections
//! - `recurring` - Recurring entry templates and materialization
//! - `query` - Trial balance, account ledger and entry search
//! - `journal` - The ledger instance tying everything together

pub mod accounts;
pub mod journal;
pub mod ledger;
pub mod query;
pub mod recurring;
pub mod workflow;

pub use journal::{
    DraftInput, DraftUpdate, Journal, PeriodOpenReport, ReclassificationRequest,
    ReversalRequest, SourceSubmission, SubmitOutcome,
};
