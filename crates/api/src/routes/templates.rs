//! Recurring entry template routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use journal_core::ledger::{JournalLine, PeriodKey};
use journal_core::recurring::{RecurrenceRule, RecurringTemplate, RuleParseError};
use journal_core::workflow::UserRole;
use journal_shared::AppError;
use journal_shared::types::TemplateId;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::Caller};

/// Creates the template routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/{template_id}", get(get_template))
        .route("/templates/{template_id}/deactivate", post(deactivate_template))
}

/// Request body for registering a template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Display name.
    pub name: String,
    /// Description copied onto instances.
    pub description: Option<String>,
    /// `monthly`, `quarterly`, `annually:<month>` or `every:<n>:<YYYY-MM>`.
    pub rule: String,
    /// Post instances without approval.
    #[serde(default)]
    pub autopost: bool,
    /// Line template.
    pub lines: Vec<JournalLine>,
    /// First period the template may fire in.
    pub starts: Option<PeriodKey>,
    /// Last period the template may fire in.
    pub ends: Option<PeriodKey>,
}

/// GET `/templates` - Every template ordered by name.
async fn list_templates(State(state): State<AppState>) -> Json<Vec<RecurringTemplate>> {
    Json(state.journal.templates())
}

/// GET `/templates/{template_id}` - One template.
async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<TemplateId>,
) -> Result<Json<RecurringTemplate>, ApiError> {
    Ok(Json(state.journal.template(template_id)?))
}

/// POST `/templates` - Register a template.
async fn create_template(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<RecurringTemplate>), ApiError> {
    caller.require(UserRole::Accountant)?;
    let rule: RecurrenceRule = payload
        .rule
        .parse()
        .map_err(|e: RuleParseError| AppError::Validation(e.to_string()))?;

    let mut template = RecurringTemplate::new(
        payload.name,
        payload.lines,
        rule,
        payload.autopost,
        caller.user_id,
    )
    .with_window(payload.starts, payload.ends);
    template.description = payload.description;

    let template_id = state.journal.register_template(template)?;
    Ok((
        StatusCode::CREATED,
        Json(state.journal.template(template_id)?),
    ))
}

/// POST `/templates/{template_id}/deactivate` - Stop a template from firing.
async fn deactivate_template(
    State(state): State<AppState>,
    caller: Caller,
    Path(template_id): Path<TemplateId>,
) -> Result<Json<RecurringTemplate>, ApiError> {
    caller.require(UserRole::Accountant)?;
    state.journal.deactivate_template(template_id)?;
    Ok(Json(state.journal.template(template_id)?))
}
