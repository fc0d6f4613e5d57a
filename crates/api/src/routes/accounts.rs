//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use journal_core::accounts::{Account, AccountDirectory};
use journal_core::ledger::LedgerError;

use crate::{AppState, error::ApiError};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{code}", get(get_account))
}

/// GET `/accounts` - Every account ordered by code.
async fn list_accounts(State(state): State<AppState>) -> Json<Vec<Account>> {
    Json(state.journal.accounts())
}

/// GET `/accounts/{code}` - One account.
async fn get_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account = state
        .journal
        .directory()
        .resolve(&code)
        .map_err(LedgerError::from)?;
    Ok(Json(account))
}
