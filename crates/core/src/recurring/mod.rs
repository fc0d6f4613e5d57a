//! Recurring entry generation.
//!
//! Templates materialize one `recurring` entry per matching period when the
//! period opens. Each instance's source document id is derived from the
//! template id and the period, so re-running the scheduler never duplicates
//! an instance.

pub mod rule;
pub mod scheduler;
pub mod template;

pub use rule::{RecurrenceRule, RuleParseError};
pub use scheduler::RecurringScheduler;
pub use template::{RECURRING_SOURCE_MODULE, RecurringTemplate};
