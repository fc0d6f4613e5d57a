//! Shared types, errors, and configuration for the journal ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money in integer minor units with exact decimal parsing
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
