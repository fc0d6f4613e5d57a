//! Structural and semantic checks on a candidate entry.
//!
//! Validation is a pure function over the entry, the account directory and
//! the period registry. It never mutates anything, so a failure leaves the
//! candidate exactly where it was.

use journal_shared::types::Money;

use super::error::{LineProblem, ValidationError};
use super::period::{PeriodKey, PeriodRegistry};
use super::types::{EntryTotals, JournalEntry, JournalLine};
use crate::accounts::AccountDirectory;

/// Minimum number of lines in an entry.
pub const MIN_LINES: usize = 2;

/// An entry that passed every check.
///
/// Only [`EntryValidator::validate`] can build one, so holding a
/// `ValidatedEntry` proves the checks ran.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    entry: JournalEntry,
    totals: EntryTotals,
}

impl ValidatedEntry {
    /// The validated entry.
    #[must_use]
    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    /// Exact debit/credit totals (always equal).
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        self.totals
    }

    /// Period the entry posts into.
    #[must_use]
    pub fn period(&self) -> PeriodKey {
        self.entry.period()
    }

    /// Unwraps the entry.
    #[must_use]
    pub fn into_entry(self) -> JournalEntry {
        self.entry
    }
}

/// Validates candidate entries against a directory and period registry.
pub struct EntryValidator<'a> {
    directory: &'a dyn AccountDirectory,
    periods: &'a PeriodRegistry,
}

impl<'a> EntryValidator<'a> {
    /// Creates a validator.
    #[must_use]
    pub fn new(directory: &'a dyn AccountDirectory, periods: &'a PeriodRegistry) -> Self {
        Self { directory, periods }
    }

    /// Runs every check in order, stopping at the first failure.
    ///
    /// 1. at least two lines
    /// 2. each line has exactly one positive amount
    /// 3. debits equal credits, in exact minor units
    /// 4. every account resolves
    /// 5. the date falls in an open period
    /// 6. auto and recurring entries carry a source reference
    pub fn validate(&self, candidate: &JournalEntry) -> Result<ValidatedEntry, ValidationError> {
        check_line_count(&candidate.lines)?;
        for (index, line) in candidate.lines.iter().enumerate() {
            check_line(index + 1, line)?;
        }
        let totals = balanced_totals(&candidate.lines)?;
        self.check_accounts(&candidate.lines)?;
        self.check_period(candidate)?;
        check_source(candidate)?;

        Ok(ValidatedEntry {
            entry: candidate.clone(),
            totals,
        })
    }

    fn check_accounts(&self, lines: &[JournalLine]) -> Result<(), ValidationError> {
        for (index, line) in lines.iter().enumerate() {
            if self.directory.resolve(&line.account_code).is_err() {
                return Err(ValidationError::InvalidAccount {
                    line: index + 1,
                    account_code: line.account_code.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_period(&self, entry: &JournalEntry) -> Result<(), ValidationError> {
        let period = entry.period();
        if self.periods.is_open(period) {
            Ok(())
        } else {
            Err(ValidationError::ClosedPeriod {
                date: entry.date,
                period,
            })
        }
    }
}

fn check_line_count(lines: &[JournalLine]) -> Result<(), ValidationError> {
    if lines.len() < MIN_LINES {
        return Err(ValidationError::TooFewLines { count: lines.len() });
    }
    Ok(())
}

/// Checks a single line. `line` is 1-based.
pub fn check_line(line: usize, candidate: &JournalLine) -> Result<(), ValidationError> {
    let malformed = |problem| ValidationError::MalformedLine { line, problem };

    if candidate.account_code.trim().is_empty() {
        return Err(malformed(LineProblem::BlankAccount));
    }
    let amount = match (candidate.debit_amount, candidate.credit_amount) {
        (Some(_), Some(_)) => return Err(malformed(LineProblem::BothSides)),
        (None, None) => return Err(malformed(LineProblem::NoAmount)),
        (Some(amount), None) | (None, Some(amount)) => amount,
    };
    if amount.is_zero() {
        return Err(malformed(LineProblem::ZeroAmount));
    }
    if amount.is_negative() {
        return Err(malformed(LineProblem::NegativeAmount));
    }
    Ok(())
}

/// Sums both sides with checked arithmetic and requires them to match.
pub fn balanced_totals(lines: &[JournalLine]) -> Result<EntryTotals, ValidationError> {
    let mut debit = Money::ZERO;
    let mut credit = Money::ZERO;
    for (index, line) in lines.iter().enumerate() {
        let overflow = ValidationError::AmountOverflow { line: index + 1 };
        debit = debit.checked_add(line.debit_or_zero()).ok_or(overflow.clone())?;
        credit = credit.checked_add(line.credit_or_zero()).ok_or(overflow)?;
    }
    if debit != credit {
        return Err(ValidationError::Unbalanced { debit, credit });
    }
    Ok(EntryTotals::new(debit, credit))
}

fn check_source(entry: &JournalEntry) -> Result<(), ValidationError> {
    if !entry.entry_type.requires_source() {
        return Ok(());
    }
    match &entry.source {
        Some(source) if !source.is_blank() => Ok(()),
        _ => Err(ValidationError::MissingSourceReference {
            entry_type: entry.entry_type.to_string(),
        }),
    }
}
