//! Recurring entry templates.

use journal_shared::types::{TemplateId, UserId};
use serde::{Deserialize, Serialize};

use super::rule::RecurrenceRule;
use crate::ledger::period::PeriodKey;
use crate::ledger::types::{
    EntryStatus, EntryType, JournalEntry, JournalLine, SYSTEM_USER, SourceKey,
};

/// Source module recorded on every materialized instance.
pub const RECURRING_SOURCE_MODULE: &str = "recurring";

/// A template that materializes one entry per matching period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Template identifier; part of every instance's source document id.
    pub id: TemplateId,
    /// Display name, e.g. "Monthly Depreciation".
    pub name: String,
    /// Description copied onto each instance. Defaults to the name.
    pub description: Option<String>,
    /// Line template.
    pub lines: Vec<JournalLine>,
    /// Which periods the template fires in.
    pub rule: RecurrenceRule,
    /// Post instances immediately instead of queueing them for approval.
    pub autopost: bool,
    /// Inactive templates never fire.
    pub active: bool,
    /// First period the template may fire in.
    pub starts: Option<PeriodKey>,
    /// Last period the template may fire in.
    pub ends: Option<PeriodKey>,
    /// Owner; recorded as creator of instances that need approval.
    pub created_by: UserId,
}

impl RecurringTemplate {
    /// Creates an active template with no period window.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        lines: Vec<JournalLine>,
        rule: RecurrenceRule,
        autopost: bool,
        created_by: UserId,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            name: name.into(),
            description: None,
            lines,
            rule,
            autopost,
            active: true,
            starts: None,
            ends: None,
            created_by,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Limits the template to periods in `starts..=ends`.
    #[must_use]
    pub fn with_window(mut self, starts: Option<PeriodKey>, ends: Option<PeriodKey>) -> Self {
        self.starts = starts;
        self.ends = ends;
        self
    }

    /// Returns true if the template fires in `period`.
    #[must_use]
    pub fn is_due(&self, period: PeriodKey) -> bool {
        self.active
            && self.starts.is_none_or(|s| period >= s)
            && self.ends.is_none_or(|e| period <= e)
            && self.rule.matches(period)
    }

    /// Idempotency key of the instance for `period`.
    #[must_use]
    pub fn source_key(&self, period: PeriodKey) -> SourceKey {
        SourceKey::new(RECURRING_SOURCE_MODULE, format!("{}:{period}", self.id))
    }

    /// The concrete entry for `period`, dated on the period's last day.
    ///
    /// Autopost instances are system candidates for immediate posting; the
    /// rest are queued for approval under the template owner's name.
    #[must_use]
    pub fn instantiate(&self, period: PeriodKey) -> JournalEntry {
        let (status, created_by) = if self.autopost {
            (EntryStatus::Draft, SYSTEM_USER)
        } else {
            (EntryStatus::PendingApproval, self.created_by)
        };
        let description = self.description.as_deref().unwrap_or(&self.name);
        let mut entry = JournalEntry::new(
            EntryType::Recurring,
            status,
            period.last_day(),
            format!("{description} ({period})"),
            self.lines.clone(),
            created_by,
        );
        entry.source = Some(self.source_key(period));
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use journal_shared::types::Money;

    fn key(s: &str) -> PeriodKey {
        s.parse().unwrap()
    }

    fn depreciation(autopost: bool) -> RecurringTemplate {
        RecurringTemplate::new(
            "Monthly Depreciation",
            vec![
                JournalLine::debit("6500", Money::from_major(1_250)),
                JournalLine::credit("1590", Money::from_major(1_250)),
            ],
            RecurrenceRule::Monthly,
            autopost,
            UserId::new(),
        )
    }

    #[test]
    fn test_window_and_active_flag() {
        let mut template =
            depreciation(true).with_window(Some(key("2026-02")), Some(key("2026-04")));
        assert!(!template.is_due(key("2026-01")));
        assert!(template.is_due(key("2026-02")));
        assert!(template.is_due(key("2026-04")));
        assert!(!template.is_due(key("2026-05")));

        template.active = false;
        assert!(!template.is_due(key("2026-03")));
    }

    #[test]
    fn test_source_key_is_deterministic() {
        let template = depreciation(true);
        let key_a = template.source_key(key("2026-03"));
        assert_eq!(key_a, template.source_key(key("2026-03")));
        assert_ne!(key_a, template.source_key(key("2026-04")));
        assert_eq!(key_a.module, "recurring");
        assert_eq!(key_a.document_id, format!("{}:2026-03", template.id));
    }

    #[test]
    fn test_autopost_instance() {
        let template = depreciation(true);
        let entry = template.instantiate(key("2026-02"));
        assert_eq!(entry.entry_type, EntryType::Recurring);
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(entry.created_by, SYSTEM_USER);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(entry.description, "Monthly Depreciation (2026-02)");
        assert_eq!(entry.source, Some(template.source_key(key("2026-02"))));
    }

    #[test]
    fn test_approval_instance_is_owned_by_template_creator() {
        let template = depreciation(false).with_description("Accrued rent");
        let entry = template.instantiate(key("2026-06"));
        assert_eq!(entry.status, EntryStatus::PendingApproval);
        assert_eq!(entry.created_by, template.created_by);
        assert_eq!(entry.description, "Accrued rent (2026-06)");
    }
}
