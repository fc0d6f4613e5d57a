//! Correcting entries for posted journal entries.
//!
//! Posted entries are never edited. A correction is a new adjusting entry:
//! - a full reversal mirrors every line of the original
//! - a reclassification mirrors each miscoded line and restates it against
//!   the correct account

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::types::{JournalEntry, JournalLine};

/// Moves one line of a posted entry to another account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCorrection {
    /// 0-based index of the miscoded line in the original entry.
    pub line_index: usize,
    /// The account the line should have posted to.
    pub account_code: String,
}

impl LineCorrection {
    /// Creates a correction.
    #[must_use]
    pub fn new(line_index: usize, account_code: impl Into<String>) -> Self {
        Self {
            line_index,
            account_code: account_code.into(),
        }
    }
}

/// Why a reclassification request cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReclassificationError {
    /// No lines were named.
    #[error("At least one line correction is required")]
    NoCorrections,

    /// The index does not name a line of the original.
    #[error("Line index {index} is out of range for an entry with {count} lines")]
    LineOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of lines in the original.
        count: usize,
    },

    /// The same line was named twice.
    #[error("Line index {0} is corrected more than once")]
    DuplicateLine(usize),

    /// The correction names the account the line already uses.
    #[error("Line index {index} already posts to account {account_code}")]
    SameAccount {
        /// The line index.
        index: usize,
        /// The unchanged account.
        account_code: String,
    },

    /// The original line is malformed and cannot be mirrored.
    #[error("Line index {0} has no single-sided amount")]
    UnmirrorableLine(usize),
}

/// Stateless service for building correcting lines.
pub struct ReversalService;

impl ReversalService {
    /// Mirrors a line: same account and amount, opposite side.
    ///
    /// Returns `None` if the line does not carry exactly one side.
    #[must_use]
    pub fn mirror_line(line: &JournalLine) -> Option<JournalLine> {
        let (side, amount) = line.side_amount()?;
        let memo = match &line.memo {
            Some(memo) => format!("Reversal: {memo}"),
            None => "Reversal".to_string(),
        };
        Some(JournalLine::on_side(line.account_code.clone(), side.opposite(), amount).with_memo(memo))
    }

    /// Lines that fully reverse an entry.
    ///
    /// Posted entries always have single-sided lines, so nothing is dropped
    /// for them.
    #[must_use]
    pub fn reversing_lines(lines: &[JournalLine]) -> Vec<JournalLine> {
        lines.iter().filter_map(Self::mirror_line).collect()
    }

    /// Lines that move the named lines to their corrected accounts.
    ///
    /// For every correction the result holds the mirror of the miscoded line
    /// followed by the line restated against the new account, so the
    /// correction is balanced whenever the original was.
    pub fn reclassification_lines(
        lines: &[JournalLine],
        corrections: &[LineCorrection],
    ) -> Result<Vec<JournalLine>, ReclassificationError> {
        if corrections.is_empty() {
            return Err(ReclassificationError::NoCorrections);
        }

        let mut seen = BTreeSet::new();
        let mut result = Vec::with_capacity(corrections.len() * 2);
        for correction in corrections {
            let index = correction.line_index;
            let original = lines
                .get(index)
                .ok_or(ReclassificationError::LineOutOfRange {
                    index,
                    count: lines.len(),
                })?;
            if !seen.insert(index) {
                return Err(ReclassificationError::DuplicateLine(index));
            }
            if original.account_code == correction.account_code {
                return Err(ReclassificationError::SameAccount {
                    index,
                    account_code: correction.account_code.clone(),
                });
            }
            let (side, amount) = original
                .side_amount()
                .ok_or(ReclassificationError::UnmirrorableLine(index))?;
            let mirror =
                Self::mirror_line(original).ok_or(ReclassificationError::UnmirrorableLine(index))?;

            result.push(mirror);
            result.push(
                JournalLine::on_side(correction.account_code.clone(), side, amount)
                    .with_memo(format!("Reclassified from {}", original.account_code)),
            );
        }
        Ok(result)
    }

    /// Description for a full reversal.
    #[must_use]
    pub fn reversal_description(original: &JournalEntry, reason: &str) -> String {
        format!("Reversal of {}. Reason: {reason}", Self::reference(original))
    }

    /// Description for a reclassification.
    #[must_use]
    pub fn reclassification_description(original: &JournalEntry) -> String {
        format!("Reclassification of {}", Self::reference(original))
    }

    fn reference(original: &JournalEntry) -> String {
        original
            .entry_number
            .map_or_else(|| original.id.to_string(), |n| n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::Side;
    use journal_shared::types::Money;

    fn original() -> Vec<JournalLine> {
        vec![
            JournalLine::debit("5100", Money::from_major(240)).with_memo("Lumber"),
            JournalLine::debit("5200", Money::from_major(60)),
            JournalLine::credit("2000", Money::from_major(300)),
        ]
    }

    #[test]
    fn test_reversing_lines_swap_sides() {
        let reversed = ReversalService::reversing_lines(&original());
        assert_eq!(reversed.len(), 3);
        assert_eq!(reversed[0].credit_amount, Some(Money::from_major(240)));
        assert_eq!(reversed[0].account_code, "5100");
        assert_eq!(reversed[0].memo.as_deref(), Some("Reversal: Lumber"));
        assert_eq!(reversed[2].debit_amount, Some(Money::from_major(300)));
    }

    #[test]
    fn test_reclassification_mirrors_and_restates() {
        let lines =
            ReversalService::reclassification_lines(&original(), &[LineCorrection::new(0, "5300")])
                .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].side_amount(), Some((Side::Credit, Money::from_major(240))));
        assert_eq!(lines[0].account_code, "5100");
        assert_eq!(lines[1].side_amount(), Some((Side::Debit, Money::from_major(240))));
        assert_eq!(lines[1].account_code, "5300");
        assert_eq!(lines[1].memo.as_deref(), Some("Reclassified from 5100"));
    }

    #[test]
    fn test_reclassification_errors() {
        let lines = original();
        assert_eq!(
            ReversalService::reclassification_lines(&lines, &[]),
            Err(ReclassificationError::NoCorrections)
        );
        assert_eq!(
            ReversalService::reclassification_lines(&lines, &[LineCorrection::new(3, "5300")]),
            Err(ReclassificationError::LineOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(
            ReversalService::reclassification_lines(
                &lines,
                &[LineCorrection::new(1, "5300"), LineCorrection::new(1, "5400")]
            ),
            Err(ReclassificationError::DuplicateLine(1))
        );
        assert!(matches!(
            ReversalService::reclassification_lines(&lines, &[LineCorrection::new(2, "2000")]),
            Err(ReclassificationError::SameAccount { index: 2, .. })
        ));
    }
}
