//! Property-based tests for the posting engine.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use journal_shared::types::Money;

use super::balance::{grand_totals, replay};
use super::period::{PeriodKey, PeriodRegistry};
use super::posting::PostingEngine;
use super::store::{EntryLog, InMemoryEntryLog};
use super::types::{EntryStatus, EntryType, JournalEntry, JournalLine, SYSTEM_USER, SourceKey};
use super::validation::EntryValidator;
use crate::accounts::{Account, InMemoryAccountDirectory, NormalSide};

const ACCOUNTS: [&str; 4] = ["1000", "2000", "4000", "5100"];

/// (month, debit account index, credit account index, amount in cents)
fn posting_strategy() -> impl Strategy<Value = (u32, usize, usize, i64)> {
    (1u32..=3, 0usize..4, 0usize..4, 1i64..10_000_000)
}

fn directory() -> InMemoryAccountDirectory {
    InMemoryAccountDirectory::from_accounts([
        Account::new("1000", "Cash", NormalSide::Debit),
        Account::new("2000", "Accounts Payable", NormalSide::Credit),
        Account::new("4000", "Revenue", NormalSide::Credit),
        Account::new("5100", "Materials", NormalSide::Debit),
    ])
    .unwrap()
}

fn entry(index: usize, month: u32, debit: usize, credit: usize, cents: i64) -> JournalEntry {
    let amount = Money::from_minor(cents);
    let mut entry = JournalEntry::new(
        EntryType::Auto,
        EntryStatus::Posted,
        NaiveDate::from_ymd_opt(2026, month, 10).unwrap(),
        "generated",
        vec![
            JournalLine::debit(ACCOUNTS[debit], amount),
            JournalLine::credit(ACCOUNTS[credit], amount),
        ],
        SYSTEM_USER,
    );
    entry.source = Some(SourceKey::new("TEST", index.to_string()));
    entry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Posted entries in each period carry sequences 1..=N in posting order,
    /// every period's trial balance nets to zero, and replaying the log
    /// reproduces the live balances.
    #[test]
    fn prop_gapless_numbers_and_zero_trial_balance(
        postings in prop::collection::vec(posting_strategy(), 1..40),
    ) {
        let directory = directory();
        let periods = Arc::new(PeriodRegistry::new());
        for month in 1..=3 {
            periods.open(PeriodKey::new(2026, month).unwrap()).unwrap();
        }
        let engine = PostingEngine::new(Arc::clone(&periods), InMemoryEntryLog::new());
        let validator = EntryValidator::new(&directory, &periods);

        for (index, (month, debit, credit, cents)) in postings.iter().enumerate() {
            let validated = validator.validate(&entry(index, *month, *debit, *credit, *cents)).unwrap();
            engine.post(validated, None).unwrap();
        }

        let replayed = replay(&engine.log().all().unwrap()).unwrap();
        for key in periods.keys() {
            let sequences: Vec<u64> = engine
                .log()
                .posted_in(key)
                .unwrap()
                .iter()
                .filter_map(|e| e.entry_number.map(|n| n.sequence))
                .collect();
            let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
            prop_assert_eq!(sequences, expected);

            let live = periods.book(key).unwrap().balances_snapshot().unwrap();
            let totals = grand_totals(&live);
            prop_assert_eq!(totals.debit_total, totals.credit_total);
            prop_assert_eq!(&live, &replayed.get(&key).cloned().unwrap_or_default());
        }
    }
}
