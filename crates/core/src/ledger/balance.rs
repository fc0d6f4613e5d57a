//! Per-account, per-period balance arithmetic.
//!
//! The posting engine stages balance deltas here before committing them,
//! and [`replay`] rebuilds the whole balance table from the entry log.

use std::collections::BTreeMap;

use journal_shared::types::Money;
use serde::{Deserialize, Serialize};

use super::error::PostingError;
use super::period::{AccountTotals, PeriodKey};
use super::types::{JournalEntry, JournalLine};

/// Totals by account code for one period.
pub type PeriodBalances = BTreeMap<String, AccountTotals>;

/// Totals by period, then account code.
pub type BalanceTable = BTreeMap<PeriodKey, PeriodBalances>;

/// Computes the totals that posting `lines` would produce, for the touched
/// accounts only. Nothing is written; the caller applies the result once
/// the entry is safely in the log.
pub fn stage_deltas(
    period: PeriodKey,
    current: &PeriodBalances,
    lines: &[JournalLine],
) -> Result<PeriodBalances, PostingError> {
    let mut staged = PeriodBalances::new();
    for line in lines {
        let totals = staged
            .entry(line.account_code.clone())
            .or_insert_with(|| current.get(&line.account_code).copied().unwrap_or_default());
        let overflow = || PostingError::BalanceOverflow {
            period,
            account_code: line.account_code.clone(),
        };
        totals.debit_total = totals
            .debit_total
            .checked_add(line.debit_or_zero())
            .ok_or_else(overflow)?;
        totals.credit_total = totals
            .credit_total
            .checked_add(line.credit_or_zero())
            .ok_or_else(overflow)?;
    }
    Ok(staged)
}

/// Rebuilds the balance table from posted entries.
pub fn replay<'a>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
) -> Result<BalanceTable, PostingError> {
    let mut table = BalanceTable::new();
    for entry in entries.into_iter().filter(|e| e.is_posted()) {
        let period = entry.period();
        let balances = table.entry(period).or_default();
        let staged = stage_deltas(period, balances, &entry.lines)?;
        balances.extend(staged);
    }
    Ok(table)
}

/// Sum of debit and credit totals across a set of account balances.
#[must_use]
pub fn grand_totals(balances: &PeriodBalances) -> AccountTotals {
    balances
        .values()
        .fold(AccountTotals::default(), |acc, t| AccountTotals {
            debit_total: acc.debit_total.saturating_add(t.debit_total),
            credit_total: acc.credit_total.saturating_add(t.credit_total),
        })
}

/// Running balance at one line of an account ledger.
///
/// - `version`: 1 for the first line in the sequence, +1 per line
/// - `previous_balance`: balance before the line
/// - `current_balance`: balance after the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position in the sequence.
    pub version: u64,
    /// Balance before this line.
    pub previous_balance: Money,
    /// Balance after this line.
    pub current_balance: Money,
}

impl RunningBalance {
    /// The state before any line, carrying an opening balance.
    #[must_use]
    pub fn opening(balance: Money) -> Self {
        Self {
            version: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// The first line on an account with no opening balance.
    #[must_use]
    pub fn first_entry(balance_change: Money) -> Self {
        Self::opening(Money::ZERO).next_entry(balance_change)
    }

    /// The line after `self`.
    #[must_use]
    pub fn next_entry(&self, balance_change: Money) -> Self {
        Self {
            version: self.version + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance.saturating_add(balance_change),
        }
    }
}
