//! Seeds a journal from the `[ledger]` configuration section.

use anyhow::{Context, anyhow};
use journal_core::Journal;
use journal_core::accounts::{Account, InMemoryAccountDirectory, NormalSide};
use journal_core::ledger::{JournalLine, PeriodKey, SYSTEM_USER};
use journal_core::recurring::{RecurrenceRule, RecurringTemplate};
use journal_shared::AppError;
use journal_shared::config::{AccountConfig, LedgerConfig, RecurringTemplateConfig};
use tracing::{info, warn};

/// Builds the account directory, registers recurring templates, then opens
/// the configured periods in ascending order so templates fire on startup.
pub fn build_journal(config: &LedgerConfig) -> anyhow::Result<Journal> {
    let accounts = config
        .accounts
        .iter()
        .map(account)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let directory = InMemoryAccountDirectory::from_accounts(accounts)
        .context("invalid chart of accounts")?;
    let journal = Journal::new(directory);

    for template in &config.recurring {
        let id = journal
            .register_template(recurring_template(template)?)
            .map_err(AppError::from)
            .with_context(|| format!("invalid recurring template '{}'", template.name))?;
        info!(template_id = %id, name = %template.name, "recurring template loaded");
    }

    let mut periods = config
        .open_periods
        .iter()
        .map(|raw| {
            raw.parse::<PeriodKey>()
                .with_context(|| format!("invalid period '{raw}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    periods.sort_unstable();
    periods.dedup();

    for period in periods {
        let report = journal
            .open_period(period)
            .map_err(AppError::from)
            .with_context(|| format!("cannot open period {period}"))?;
        for failure in &report.failures {
            warn!(
                %period,
                template = %failure.name,
                error = %failure.message,
                "recurring template skipped at startup"
            );
        }
    }

    Ok(journal)
}

fn account(config: &AccountConfig) -> anyhow::Result<Account> {
    let side = NormalSide::parse(&config.normal_side).ok_or_else(|| {
        anyhow!(
            "account {}: normal_side must be 'debit' or 'credit', got '{}'",
            config.code,
            config.normal_side
        )
    })?;
    Ok(Account::new(config.code.trim(), config.name.trim(), side))
}

fn recurring_template(config: &RecurringTemplateConfig) -> anyhow::Result<RecurringTemplate> {
    let rule: RecurrenceRule = config.rule.parse()?;
    let lines = config
        .lines
        .iter()
        .map(|line| JournalLine {
            account_code: line.account_code.clone(),
            debit_amount: line.debit,
            credit_amount: line.credit,
            memo: None,
        })
        .collect();
    Ok(RecurringTemplate::new(
        config.name.clone(),
        lines,
        rule,
        config.autopost,
        SYSTEM_USER,
    ))
}
