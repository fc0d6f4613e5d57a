//! Property-based tests for ReversalService.

use proptest::prelude::*;

use journal_shared::types::Money;

use super::reversal::{LineCorrection, ReversalService};
use crate::ledger::types::{JournalLine, Side};
use crate::ledger::validation::balanced_totals;

fn arb_amount() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor)
}

fn arb_account() -> impl Strategy<Value = String> {
    prop_oneof![Just("1000"), Just("2000"), Just("5100"), Just("6100")].prop_map(String::from)
}

/// Balanced entries: each amount once as a debit, once as a credit.
fn arb_balanced_lines() -> impl Strategy<Value = Vec<JournalLine>> {
    prop::collection::vec((arb_account(), arb_account(), arb_amount()), 1..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .flat_map(|(debit, credit, amount)| {
                [JournalLine::debit(debit, amount), JournalLine::credit(credit, amount)]
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A reversal is balanced, swaps every side and keeps accounts and amounts.
    #[test]
    fn prop_reversal_mirrors_every_line(lines in arb_balanced_lines()) {
        let reversed = ReversalService::reversing_lines(&lines);
        prop_assert_eq!(reversed.len(), lines.len());
        prop_assert!(balanced_totals(&reversed).is_ok());
        for (original, mirror) in lines.iter().zip(&reversed) {
            let (side, amount) = original.side_amount().unwrap();
            prop_assert_eq!(mirror.side_amount(), Some((side.opposite(), amount)));
            prop_assert_eq!(&mirror.account_code, &original.account_code);
        }
    }

    /// An entry plus its reversal nets every account to zero.
    #[test]
    fn prop_reversal_nets_to_zero(lines in arb_balanced_lines()) {
        let reversed = ReversalService::reversing_lines(&lines);
        let net = |code: &str| -> i64 {
            lines
                .iter()
                .chain(&reversed)
                .filter(|l| l.account_code == code)
                .map(|l| match l.side_amount() {
                    Some((Side::Debit, a)) => a.minor_units(),
                    Some((Side::Credit, a)) => -a.minor_units(),
                    None => 0,
                })
                .sum()
        };
        for code in ["1000", "2000", "5100", "6100"] {
            prop_assert_eq!(net(code), 0);
        }
    }

    /// Reclassifying any single line yields a balanced two-line correction.
    #[test]
    fn prop_reclassification_is_balanced(
        lines in arb_balanced_lines(),
        index in any::<prop::sample::Index>(),
    ) {
        let index = index.index(lines.len());
        let target = if lines[index].account_code == "9000" { "9100" } else { "9000" };
        let correction = ReversalService::reclassification_lines(
            &lines,
            &[LineCorrection::new(index, target)],
        );
        prop_assert!(correction.is_ok());
        let correction = correction.unwrap();
        prop_assert_eq!(correction.len(), 2);
        prop_assert!(balanced_totals(&correction).is_ok());
        prop_assert_eq!(&correction[1].account_code, target);
    }
}
