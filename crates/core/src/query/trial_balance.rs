//! Trial balance projection.

use journal_shared::types::Money;
use serde::Serialize;

use crate::accounts::{AccountDirectory, NormalSide};
use crate::ledger::balance::{PeriodBalances, grand_totals};
use crate::ledger::period::{PeriodKey, PeriodStatus};

/// One account's totals in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub account_code: String,
    /// Account name, if the directory still knows the code.
    pub account_name: Option<String>,
    /// Normal side, if known.
    pub normal_side: Option<NormalSide>,
    /// Sum of debit postings.
    pub debit_total: Money,
    /// Sum of credit postings.
    pub credit_total: Money,
    /// Net balance on the account's normal side.
    pub balance: Money,
}

/// Per-period report confirming debits equal credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    /// The period.
    pub period: PeriodKey,
    /// Period status when the report was taken.
    pub status: PeriodStatus,
    /// Rows ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debit postings.
    pub total_debit: Money,
    /// Sum of all credit postings.
    pub total_credit: Money,
    /// Whether the totals agree.
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Builds the report from a period's balance snapshot.
    #[must_use]
    pub fn build(
        period: PeriodKey,
        status: PeriodStatus,
        balances: &PeriodBalances,
        directory: &dyn AccountDirectory,
    ) -> Self {
        let rows = balances
            .iter()
            .map(|(code, totals)| {
                let account = directory.resolve(code).ok();
                let normal_side = account.as_ref().map(|a| a.normal_side);
                TrialBalanceRow {
                    account_code: code.clone(),
                    account_name: account.map(|a| a.name),
                    normal_side,
                    debit_total: totals.debit_total,
                    credit_total: totals.credit_total,
                    balance: normal_side
                        .unwrap_or(NormalSide::Debit)
                        .balance_change(totals.debit_total, totals.credit_total),
                }
            })
            .collect();
        let totals = grand_totals(balances);

        Self {
            period,
            status,
            rows,
            total_debit: totals.debit_total,
            total_credit: totals.credit_total,
            is_balanced: totals.debit_total == totals.credit_total,
        }
    }

    /// Total debits minus total credits; zero for any consistent ledger.
    #[must_use]
    pub fn difference(&self) -> Money {
        self.total_debit.saturating_sub(self.total_credit)
    }
}
