//! Holds recurring templates and picks the ones due in a period.

use dashmap::DashMap;
use journal_shared::types::TemplateId;
use tracing::info;

use super::template::RecurringTemplate;
use crate::ledger::error::{LedgerError, ValidationError};
use crate::ledger::period::PeriodKey;
use crate::ledger::validation::{MIN_LINES, balanced_totals, check_line};

/// Registry of recurring templates.
#[derive(Debug, Default)]
pub struct RecurringScheduler {
    templates: DashMap<TemplateId, RecurringTemplate>,
}

impl RecurringScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template after checking its line template.
    ///
    /// Account codes and periods are checked per instance, since both can
    /// change between registration and materialization.
    pub fn register(&self, template: RecurringTemplate) -> Result<TemplateId, ValidationError> {
        if template.lines.len() < MIN_LINES {
            return Err(ValidationError::TooFewLines {
                count: template.lines.len(),
            });
        }
        for (index, line) in template.lines.iter().enumerate() {
            check_line(index + 1, line)?;
        }
        balanced_totals(&template.lines)?;

        let id = template.id;
        info!(template_id = %id, name = %template.name, rule = %template.rule, "recurring template registered");
        self.templates.insert(id, template);
        Ok(id)
    }

    /// Stops a template from firing again.
    pub fn deactivate(&self, id: TemplateId) -> Result<(), LedgerError> {
        let mut template = self
            .templates
            .get_mut(&id)
            .ok_or(LedgerError::TemplateNotFound(id))?;
        template.active = false;
        info!(template_id = %id, "recurring template deactivated");
        Ok(())
    }

    /// A template by id.
    #[must_use]
    pub fn get(&self, id: TemplateId) -> Option<RecurringTemplate> {
        self.templates.get(&id).map(|t| t.clone())
    }

    /// Every template, ordered by name.
    #[must_use]
    pub fn templates(&self) -> Vec<RecurringTemplate> {
        let mut all: Vec<_> = self.templates.iter().map(|t| t.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        all
    }

    /// Templates that fire in `period`, ordered by name.
    #[must_use]
    pub fn due_for(&self, period: PeriodKey) -> Vec<RecurringTemplate> {
        self.templates()
            .into_iter()
            .filter(|t| t.is_due(period))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::JournalLine;
    use crate::recurring::rule::RecurrenceRule;
    use journal_shared::types::{Money, UserId};

    fn template(name: &str, rule: RecurrenceRule) -> RecurringTemplate {
        RecurringTemplate::new(
            name,
            vec![
                JournalLine::debit("6500", Money::from_major(100)),
                JournalLine::credit("1590", Money::from_major(100)),
            ],
            rule,
            true,
            UserId::new(),
        )
    }

    #[test]
    fn test_due_for_filters_by_rule() {
        let scheduler = RecurringScheduler::new();
        scheduler.register(template("Rent", RecurrenceRule::Monthly)).unwrap();
        scheduler
            .register(template("Insurance", RecurrenceRule::Quarterly))
            .unwrap();

        let february: Vec<_> = scheduler
            .due_for("2026-02".parse().unwrap())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(february, vec!["Rent"]);

        let april: Vec<_> = scheduler
            .due_for("2026-04".parse().unwrap())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(april, vec!["Insurance", "Rent"]);
    }

    #[test]
    fn test_register_rejects_unbalanced_template() {
        let scheduler = RecurringScheduler::new();
        let mut bad = template("Bad", RecurrenceRule::Monthly);
        bad.lines[1] = JournalLine::credit("1590", Money::from_major(90));
        assert!(matches!(
            scheduler.register(bad),
            Err(ValidationError::Unbalanced { .. })
        ));
        assert!(scheduler.templates().is_empty());
    }

    #[test]
    fn test_deactivate() {
        let scheduler = RecurringScheduler::new();
        let id = scheduler.register(template("Rent", RecurrenceRule::Monthly)).unwrap();
        scheduler.deactivate(id).unwrap();
        assert!(scheduler.due_for("2026-01".parse().unwrap()).is_empty());
        assert!(!scheduler.get(id).unwrap().active);
        assert!(matches!(
            scheduler.deactivate(TemplateId::new()),
            Err(LedgerError::TemplateNotFound(_))
        ));
    }
}
