//! Journal entry routes: drafting, the approval workflow and corrections.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use journal_core::ledger::{EntryStatus, EntryTotals, EntryType, JournalEntry, JournalLine};
use journal_core::query::EntryFilter;
use journal_core::workflow::{LineCorrection, UserRole};
use journal_core::{DraftInput, DraftUpdate, ReclassificationRequest, ReversalRequest};
use journal_shared::types::{EntryId, Money, PageRequest, PageResponse};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, middleware::Caller};

/// Creates the entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_draft))
        .route(
            "/entries/{entry_id}",
            get(get_entry).patch(update_draft).delete(discard_draft),
        )
        .route("/entries/{entry_id}/validate", post(validate_entry))
        .route("/entries/{entry_id}/submit", post(submit_for_approval))
        .route("/entries/{entry_id}/approve", post(approve))
        .route("/entries/{entry_id}/reject", post(reject))
        .route("/entries/{entry_id}/reverse", post(reverse))
        .route("/entries/{entry_id}/reclassify", post(reclassify))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by entry type.
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    /// Earliest date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Latest date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Only entries touching this account.
    pub account: Option<String>,
    /// Only entries from this source module.
    pub source_module: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

impl ListEntriesQuery {
    fn split(self) -> (EntryFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };
        let filter = EntryFilter {
            status: self.status,
            entry_type: self.entry_type,
            date_from: self.from,
            date_to: self.to,
            account_code: self.account,
            source_module: self.source_module,
        };
        (filter, page)
    }
}

/// Request body for creating a draft.
#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    /// `manual` (default) or `adjusting`.
    #[serde(rename = "type", default = "default_draft_type")]
    pub entry_type: EntryType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Lines; may be incomplete while drafting.
    #[serde(default)]
    pub lines: Vec<JournalLine>,
    /// Optional memo.
    pub memo: Option<String>,
}

fn default_draft_type() -> EntryType {
    EntryType::Manual
}

/// Request body for rejecting an entry.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Why the entry is turned down.
    pub reason: String,
}

/// Request body for reversing a posted entry.
#[derive(Debug, Deserialize)]
pub struct ReverseRequest {
    /// Date of the reversing entry.
    pub date: NaiveDate,
    /// Why the entry is reversed.
    #[serde(default)]
    pub reason: String,
}

/// Request body for reclassifying a posted entry.
#[derive(Debug, Deserialize)]
pub struct ReclassifyRequest {
    /// Date of the adjusting entry.
    pub date: NaiveDate,
    /// Lines to move and their correct accounts.
    pub corrections: Vec<LineCorrection>,
    /// Optional memo.
    pub memo: Option<String>,
}

/// An entry as returned by the API.
#[derive(Debug, Serialize)]
pub struct EntryView {
    /// The entry.
    #[serde(flatten)]
    pub entry: JournalEntry,
    /// Posting number rendered as `JE-YYYYMM-NNNNNN`.
    pub number: Option<String>,
    /// Sum of debit lines.
    pub total_debit: Money,
    /// Sum of credit lines.
    pub total_credit: Money,
}

impl From<JournalEntry> for EntryView {
    fn from(entry: JournalEntry) -> Self {
        let totals = entry.totals();
        Self {
            number: entry.entry_number.map(|n| n.to_string()),
            total_debit: totals.debit,
            total_credit: totals.credit,
            entry,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/entries` - List entries with filters and pagination.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> Json<PageResponse<EntryView>> {
    let (filter, page) = query.split();
    let entries: Vec<EntryView> = state
        .journal
        .list_entries(&filter)
        .into_iter()
        .map(EntryView::from)
        .collect();
    Json(page.paginate(entries))
}

/// POST `/entries` - Create a manual or adjusting draft.
async fn create_draft(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateDraftRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(UserRole::Submitter)?;
    let entry_id = state.journal.create_draft(DraftInput {
        entry_type: payload.entry_type,
        date: payload.date,
        description: payload.description,
        lines: payload.lines,
        memo: payload.memo,
        created_by: caller.user_id,
    })?;
    let entry = state.journal.get_entry(entry_id)?;
    Ok((StatusCode::CREATED, Json(EntryView::from(entry))))
}

/// GET `/entries/{entry_id}` - Fetch one entry.
async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<EntryView>, ApiError> {
    Ok(Json(state.journal.get_entry(entry_id)?.into()))
}

/// PATCH `/entries/{entry_id}` - Edit a draft.
async fn update_draft(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
    Json(payload): Json<DraftUpdate>,
) -> Result<Json<EntryView>, ApiError> {
    let entry = state
        .journal
        .update_draft(entry_id, caller.user_id, payload)?;
    Ok(Json(entry.into()))
}

/// DELETE `/entries/{entry_id}` - Discard a draft.
async fn discard_draft(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
) -> Result<StatusCode, ApiError> {
    state.journal.discard_draft(entry_id, caller.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/entries/{entry_id}/validate` - Run validation without side effects.
async fn validate_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<EntryTotals>, ApiError> {
    Ok(Json(state.journal.validate_entry(entry_id)?))
}

/// POST `/entries/{entry_id}/submit` - Send a draft for approval.
async fn submit_for_approval(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<EntryView>, ApiError> {
    let entry = state
        .journal
        .submit_for_approval(entry_id, caller.user_id)?;
    Ok(Json(entry.into()))
}

/// POST `/entries/{entry_id}/approve` - Approve and post a pending entry.
async fn approve(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
) -> Result<Json<EntryView>, ApiError> {
    let approver = caller.approver()?;
    let posted = state
        .blocking(move |journal| journal.approve(entry_id, &approver))
        .await?;
    Ok(Json(posted.into()))
}

/// POST `/entries/{entry_id}/reject` - Reject a pending entry.
async fn reject(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<EntryView>, ApiError> {
    let approver = caller.approver()?;
    let entry = state
        .journal
        .reject(entry_id, &approver, &payload.reason)?;
    Ok(Json(entry.into()))
}

/// POST `/entries/{entry_id}/reverse` - Draft a full reversal.
async fn reverse(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
    Json(payload): Json<ReverseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(UserRole::Submitter)?;
    let draft_id = state.journal.reverse(ReversalRequest {
        original: entry_id,
        date: payload.date,
        created_by: caller.user_id,
        reason: payload.reason,
    })?;
    let draft = state.journal.get_entry(draft_id)?;
    Ok((StatusCode::CREATED, Json(EntryView::from(draft))))
}

/// POST `/entries/{entry_id}/reclassify` - Draft a reclassification.
async fn reclassify(
    State(state): State<AppState>,
    caller: Caller,
    Path(entry_id): Path<EntryId>,
    Json(payload): Json<ReclassifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require(UserRole::Submitter)?;
    let draft_id = state.journal.reclassify(ReclassificationRequest {
        original: entry_id,
        corrections: payload.corrections,
        date: payload.date,
        created_by: caller.user_id,
        memo: payload.memo,
    })?;
    let draft = state.journal.get_entry(draft_id)?;
    Ok((StatusCode::CREATED, Json(EntryView::from(draft))))
}
