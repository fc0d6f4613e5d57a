//! Account ledger projection: one account's postings with a running balance.

use chrono::NaiveDate;
use journal_shared::types::{EntryId, Money};
use serde::Serialize;

use crate::accounts::{Account, NormalSide};
use crate::ledger::balance::RunningBalance;
use crate::ledger::period::{AccountTotals, PeriodKey};
use crate::ledger::types::{EntryNumber, JournalEntry};

/// One posting on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLedgerLine {
    /// The entry the line belongs to.
    pub entry_id: EntryId,
    /// The entry's posting number.
    pub entry_number: Option<EntryNumber>,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Line memo.
    pub memo: Option<String>,
    /// Debit amount, zero for credit lines.
    pub debit: Money,
    /// Credit amount, zero for debit lines.
    pub credit: Money,
    /// Balance before and after the line, on the normal side.
    pub running: RunningBalance,
}

/// Running-balance sequence for one account in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLedger {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Normal side the balances are expressed on.
    pub normal_side: NormalSide,
    /// The period.
    pub period: PeriodKey,
    /// Balance carried in from earlier periods.
    pub opening_balance: Money,
    /// Postings in entry-number order.
    pub lines: Vec<AccountLedgerLine>,
    /// Sum of debits in the period.
    pub debit_total: Money,
    /// Sum of credits in the period.
    pub credit_total: Money,
    /// Balance after the last posting.
    pub closing_balance: Money,
}

impl AccountLedger {
    /// Builds the ledger.
    ///
    /// `prior` holds the account's totals in every earlier period; `posted`
    /// holds the period's posted entries in posting order.
    #[must_use]
    pub fn build<'a>(
        account: &Account,
        period: PeriodKey,
        prior: impl IntoIterator<Item = AccountTotals>,
        posted: impl IntoIterator<Item = &'a JournalEntry>,
    ) -> Self {
        let side = account.normal_side;
        let opening_balance = prior.into_iter().fold(Money::ZERO, |acc, totals| {
            acc.saturating_add(side.balance_change(totals.debit_total, totals.credit_total))
        });

        let mut running = RunningBalance::opening(opening_balance);
        let mut debit_total = Money::ZERO;
        let mut credit_total = Money::ZERO;
        let mut lines = Vec::new();

        for entry in posted {
            for line in entry.lines.iter().filter(|l| l.account_code == account.code) {
                let debit = line.debit_or_zero();
                let credit = line.credit_or_zero();
                debit_total = debit_total.saturating_add(debit);
                credit_total = credit_total.saturating_add(credit);
                running = running.next_entry(side.balance_change(debit, credit));
                lines.push(AccountLedgerLine {
                    entry_id: entry.id,
                    entry_number: entry.entry_number,
                    date: entry.date,
                    description: entry.description.clone(),
                    memo: line.memo.clone(),
                    debit,
                    credit,
                    running,
                });
            }
        }

        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            normal_side: side,
            period,
            opening_balance,
            lines,
            debit_total,
            credit_total,
            closing_balance: running.current_balance,
        }
    }
}
