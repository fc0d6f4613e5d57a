//! Account directory types and the in-memory implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use journal_shared::types::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The side on which an account's balance normally sits.
///
/// - Debit-normal (assets, expenses): balance += debit - credit
/// - Credit-normal (liabilities, equity, revenue): balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal.
    Debit,
    /// Credit-normal.
    Credit,
}

impl NormalSide {
    /// Parses `debit` / `credit` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Signed balance change for a debit/credit pair on an account of this side.
    #[must_use]
    pub fn balance_change(self, debit: Money, credit: Money) -> Money {
        match self {
            Self::Debit => debit.saturating_sub(credit),
            Self::Credit => credit.saturating_sub(debit),
        }
    }
}

impl fmt::Display for NormalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, stable identifier.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Normal balance side.
    pub normal_side: NormalSide,
}

impl Account {
    /// Creates a new account.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, normal_side: NormalSide) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            normal_side,
        }
    }
}

/// Errors raised by the account directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No account with this code.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// An account with this code is already registered.
    #[error("Account {0} already exists")]
    Duplicate(String),

    /// Account code is blank.
    #[error("Account code must not be empty")]
    EmptyCode,

    /// The directory's storage is unusable.
    #[error("Account directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-mostly lookup from account code to account.
pub trait AccountDirectory: Send + Sync {
    /// Resolves an account by code.
    fn resolve(&self, code: &str) -> Result<Account, DirectoryError>;

    /// Returns every account ordered by code.
    fn accounts(&self) -> Vec<Account>;
}

/// Directory backed by an ordered map.
///
/// Accounts can be registered but never edited or removed, so an account
/// referenced by a posted entry stays exactly as it was.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<BTreeMap<String, Account>>,
}

impl InMemoryAccountDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a list of accounts.
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self, DirectoryError> {
        let directory = Self::new();
        for account in accounts {
            directory.register(account)?;
        }
        Ok(directory)
    }

    /// Registers a new account.
    pub fn register(&self, account: Account) -> Result<(), DirectoryError> {
        if account.code.trim().is_empty() {
            return Err(DirectoryError::EmptyCode);
        }
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        if accounts.contains_key(&account.code) {
            return Err(DirectoryError::Duplicate(account.code));
        }
        accounts.insert(account.code.clone(), account);
        Ok(())
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Returns true if no account is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn resolve(&self, code: &str) -> Result<Account, DirectoryError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        accounts
            .get(code)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(code.to_string()))
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts
            .read()
            .map(|a| a.values().cloned().collect())
            .unwrap_or_default()
    }
}
