//! Property-based tests for entry validation rules.

use proptest::prelude::*;

use journal_shared::types::Money;

use super::error::{LineProblem, ValidationError};
use super::types::{JournalLine, Side};
use super::validation::{balanced_totals, check_line};

/// Positive amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor)
}

/// Negative amounts from -0.01 to -1,000,000.00.
fn negative_amount() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(|cents| Money::from_minor(-cents))
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Debit), Just(Side::Credit)]
}

/// Lines whose debits and credits match: every amount appears once on each side.
fn balanced_lines() -> impl Strategy<Value = Vec<JournalLine>> {
    prop::collection::vec(positive_amount(), 1..8).prop_map(|amounts| {
        amounts
            .iter()
            .flat_map(|a| {
                [
                    JournalLine::debit("1000", *a),
                    JournalLine::credit("2000", *a),
                ]
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any positive single-sided line passes the line check.
    #[test]
    fn prop_positive_line_accepted(side in side_strategy(), amount in positive_amount()) {
        prop_assert!(check_line(1, &JournalLine::on_side("1000", side, amount)).is_ok());
    }

    /// Zero amounts are rejected on either side.
    #[test]
    fn prop_zero_amount_rejected(side in side_strategy()) {
        let result = check_line(1, &JournalLine::on_side("1000", side, Money::ZERO));
        prop_assert_eq!(
            result,
            Err(ValidationError::MalformedLine { line: 1, problem: LineProblem::ZeroAmount })
        );
    }

    /// Negative amounts are rejected on either side.
    #[test]
    fn prop_negative_amount_rejected(side in side_strategy(), amount in negative_amount()) {
        let result = check_line(4, &JournalLine::on_side("1000", side, amount));
        prop_assert_eq!(
            result,
            Err(ValidationError::MalformedLine { line: 4, problem: LineProblem::NegativeAmount })
        );
    }

    /// A line carrying both sides is rejected whatever the amounts.
    #[test]
    fn prop_both_sides_rejected(debit in positive_amount(), credit in positive_amount()) {
        let mut line = JournalLine::debit("1000", debit);
        line.credit_amount = Some(credit);
        let is_both_sides = matches!(
            check_line(1, &line),
            Err(ValidationError::MalformedLine { problem: LineProblem::BothSides, .. })
        );
        prop_assert!(is_both_sides);
    }

    /// Balanced lines pass and report equal totals.
    #[test]
    fn prop_balanced_lines_accepted(lines in balanced_lines()) {
        let totals = balanced_totals(&lines);
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Any nonzero imbalance is caught, even a single minor unit.
    #[test]
    fn prop_any_imbalance_rejected(lines in balanced_lines(), extra in positive_amount()) {
        let mut lines = lines;
        lines.push(JournalLine::debit("1000", extra));
        let is_unbalanced = matches!(
            balanced_totals(&lines),
            Err(ValidationError::Unbalanced { .. })
        );
        prop_assert!(is_unbalanced);
    }

    /// The reported difference equals the injected imbalance.
    #[test]
    fn prop_unbalanced_reports_exact_totals(lines in balanced_lines(), extra in positive_amount()) {
        let expected: Money = lines.iter().map(JournalLine::debit_or_zero).sum();
        let mut lines = lines;
        lines.push(JournalLine::credit("2000", extra));
        match balanced_totals(&lines) {
            Err(ValidationError::Unbalanced { debit, credit }) => {
                prop_assert_eq!(debit, expected);
                prop_assert_eq!(credit.checked_sub(debit), Some(extra));
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }
}
