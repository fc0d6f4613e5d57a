//! Recurrence rules: which periods a template fires in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::period::PeriodKey;

/// When a recurring template materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Every period.
    Monthly,
    /// January, April, July and October.
    Quarterly,
    /// Once a year, in the given month.
    Annually {
        /// Calendar month, 1-12.
        month: u32,
    },
    /// Every `interval` months counted from `anchor` (inclusive).
    EveryNMonths {
        /// Months between instances, at least 1.
        interval: u32,
        /// First period the rule fires in.
        anchor: PeriodKey,
    },
}

/// Error parsing a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid recurrence rule '{0}', expected monthly, quarterly, annually:<month> or every:<n>:<YYYY-MM>")]
pub struct RuleParseError(pub String);

impl RecurrenceRule {
    /// Returns true if the rule fires in `period`.
    #[must_use]
    pub fn matches(&self, period: PeriodKey) -> bool {
        match *self {
            Self::Monthly => true,
            Self::Quarterly => period.month() % 3 == 1,
            Self::Annually { month } => period.month() == month,
            Self::EveryNMonths { interval, anchor } => {
                let elapsed = period.months_since(&anchor);
                interval > 0 && elapsed >= 0 && elapsed % i64::from(interval) == 0
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RuleParseError(s.to_string());
        let normalized = s.trim().to_lowercase();
        let mut parts = normalized.split(':');

        let rule = match parts.next() {
            Some("monthly") => Self::Monthly,
            Some("quarterly") => Self::Quarterly,
            Some("annually") => {
                let month: u32 = parts.next().and_then(|m| m.parse().ok()).ok_or_else(err)?;
                if !(1..=12).contains(&month) {
                    return Err(err());
                }
                Self::Annually { month }
            }
            Some("every") => {
                let interval: u32 = parts
                    .next()
                    .and_then(|n| n.parse().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(err)?;
                let anchor = parts
                    .next()
                    .and_then(|a| a.parse().ok())
                    .ok_or_else(err)?;
                Self::EveryNMonths { interval, anchor }
            }
            _ => return Err(err()),
        };

        if parts.next().is_some() {
            return Err(err());
        }
        Ok(rule)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Quarterly => f.write_str("quarterly"),
            Self::Annually { month } => write!(f, "annually:{month}"),
            Self::EveryNMonths { interval, anchor } => write!(f, "every:{interval}:{anchor}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(s: &str) -> PeriodKey {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("2026-01", true)]
    #[case("2026-02", false)]
    #[case("2026-04", true)]
    #[case("2026-07", true)]
    #[case("2026-10", true)]
    #[case("2026-12", false)]
    fn test_quarterly(#[case] period: &str, #[case] expected: bool) {
        assert_eq!(RecurrenceRule::Quarterly.matches(key(period)), expected);
    }

    #[test]
    fn test_monthly_and_annually() {
        assert!(RecurrenceRule::Monthly.matches(key("2026-05")));
        let rule = RecurrenceRule::Annually { month: 12 };
        assert!(rule.matches(key("2026-12")));
        assert!(!rule.matches(key("2026-11")));
    }

    #[rstest]
    #[case("2025-11", false)]
    #[case("2026-01", true)]
    #[case("2026-03", false)]
    #[case("2026-07", true)]
    #[case("2027-01", true)]
    fn test_every_six_months(#[case] period: &str, #[case] expected: bool) {
        let rule = RecurrenceRule::EveryNMonths {
            interval: 6,
            anchor: key("2026-01"),
        };
        assert_eq!(rule.matches(key(period)), expected);
    }

    #[rstest]
    #[case("monthly", RecurrenceRule::Monthly)]
    #[case(" Quarterly ", RecurrenceRule::Quarterly)]
    #[case("annually:6", RecurrenceRule::Annually { month: 6 })]
    #[case("every:2:2026-03", RecurrenceRule::EveryNMonths { interval: 2, anchor: "2026-03".parse().unwrap() })]
    fn test_parse(#[case] input: &str, #[case] expected: RecurrenceRule) {
        assert_eq!(input.parse::<RecurrenceRule>(), Ok(expected));
    }

    #[rstest]
    #[case("weekly")]
    #[case("annually")]
    #[case("annually:13")]
    #[case("every:0:2026-01")]
    #[case("every:2")]
    #[case("monthly:extra")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let rule = RecurrenceRule::EveryNMonths {
            interval: 3,
            anchor: key("2026-02"),
        };
        assert_eq!(rule.to_string().parse::<RecurrenceRule>(), Ok(rule));
    }
}
