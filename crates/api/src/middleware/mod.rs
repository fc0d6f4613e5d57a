//! Request middleware.

pub mod identity;

pub use identity::{Caller, identity_middleware};
