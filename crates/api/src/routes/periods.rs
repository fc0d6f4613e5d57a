//! Accounting period routes and period-scoped reports.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use journal_core::PeriodOpenReport;
use journal_core::ledger::{PeriodKey, PeriodStatus};
use journal_core::query::{AccountLedger, TrialBalance};
use journal_core::workflow::UserRole;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError, middleware::Caller};

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods", get(list_periods))
        .route("/periods/{period}/open", post(open_period))
        .route("/periods/{period}/close", post(close_period))
        .route("/periods/{period}/trial-balance", get(trial_balance))
        .route("/periods/{period}/accounts/{code}/ledger", get(account_ledger))
        .route("/balances/verify", post(verify_balances))
}

/// A period and its status.
#[derive(Debug, Serialize)]
pub struct PeriodView {
    /// The period key.
    pub period: PeriodKey,
    /// Open or closed.
    pub status: PeriodStatus,
}

/// GET `/periods` - Every known period, ascending.
async fn list_periods(State(state): State<AppState>) -> Json<Vec<PeriodView>> {
    Json(
        state
            .journal
            .periods()
            .into_iter()
            .map(|(period, status)| PeriodView { period, status })
            .collect(),
    )
}

/// POST `/periods/{period}/open` - Open a period and run the recurring scheduler.
async fn open_period(
    State(state): State<AppState>,
    caller: Caller,
    Path(period): Path<PeriodKey>,
) -> Result<Json<PeriodOpenReport>, ApiError> {
    caller.require(UserRole::Accountant)?;
    let report = state
        .blocking(move |journal| journal.open_period(period))
        .await?;
    Ok(Json(report))
}

/// POST `/periods/{period}/close` - Close a period.
async fn close_period(
    State(state): State<AppState>,
    caller: Caller,
    Path(period): Path<PeriodKey>,
) -> Result<Json<PeriodView>, ApiError> {
    caller.require(UserRole::Accountant)?;
    state
        .blocking(move |journal| journal.close_period(period))
        .await?;
    Ok(Json(PeriodView {
        period,
        status: PeriodStatus::Closed,
    }))
}

/// GET `/periods/{period}/trial-balance` - Debit and credit totals by account.
async fn trial_balance(
    State(state): State<AppState>,
    Path(period): Path<PeriodKey>,
) -> Result<Json<TrialBalance>, ApiError> {
    let trial_balance = state
        .blocking(move |journal| journal.trial_balance(period))
        .await?;
    Ok(Json(trial_balance))
}

/// GET `/periods/{period}/accounts/{code}/ledger` - One account's postings.
async fn account_ledger(
    State(state): State<AppState>,
    Path((period, code)): Path<(PeriodKey, String)>,
) -> Result<Json<AccountLedger>, ApiError> {
    let ledger = state
        .blocking(move |journal| journal.account_ledger(&code, period))
        .await?;
    Ok(Json(ledger))
}

/// POST `/balances/verify` - Replay the entry log against the live balances.
async fn verify_balances(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Value>, ApiError> {
    caller.require(UserRole::Accountant)?;
    state
        .blocking(|journal| journal.verify_balances())
        .await?;
    Ok(Json(json!({ "status": "consistent" })))
}
