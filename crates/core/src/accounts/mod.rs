//! Chart-of-accounts lookup.
//!
//! The directory is populated out-of-band (configuration or import) and is
//! read-only from the ledger's point of view.

pub mod directory;

pub use directory::{Account, AccountDirectory, DirectoryError, InMemoryAccountDirectory, NormalSide};
