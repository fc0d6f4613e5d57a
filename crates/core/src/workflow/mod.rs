//! Entry workflow management.
//!
//! This module implements the approval state machine, approval authority
//! and correcting-entry construction.
//!
//! # Modules
//!
//! - `types` - Workflow actions and refusal reasons
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic
//! - `approval` - Roles and the approver capability
//! - `reversal` - Reversal and reclassification lines

pub mod approval;
pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod service_props;

pub use approval::{Approver, UserRole};
pub use error::WorkflowError;
pub use reversal::{LineCorrection, ReclassificationError, ReversalService};
pub use service::WorkflowService;
pub use types::{TransitionDenied, WorkflowAction};
