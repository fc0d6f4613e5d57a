//! Source Module Adapter routes.
//!
//! Upstream business modules (AP, AR, payroll, ...) submit balanced entries
//! keyed by their own document id. Resubmitting the same document returns the
//! original entry instead of posting twice.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use chrono::NaiveDate;
use journal_core::SourceSubmission;
use journal_core::ledger::JournalLine;
use journal_core::workflow::UserRole;
use journal_shared::types::EntryId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::Caller};

/// Creates the source module routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sources/{module}/entries", post(submit_entry))
}

/// Request body for a source-module submission.
#[derive(Debug, Deserialize)]
pub struct SourceEntryRequest {
    /// The module's document identifier.
    pub source_document_id: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description; defaults to `"{module} {document}"`.
    pub description: Option<String>,
    /// Lines.
    pub lines: Vec<JournalLine>,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Response for a source-module submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// The entry holding the source key.
    pub entry_id: EntryId,
    /// True if the document was already submitted.
    pub duplicate: bool,
    /// Posting number, once known.
    pub entry_number: Option<String>,
}

/// POST `/sources/{module}/entries` - Submit and post an auto entry.
///
/// Returns 201 for a new posting and 200 for a duplicate submission.
async fn submit_entry(
    State(state): State<AppState>,
    caller: Caller,
    Path(module): Path<String>,
    Json(payload): Json<SourceEntryRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    caller.require(UserRole::Submitter)?;
    let submission = SourceSubmission {
        source_module: module,
        source_document_id: payload.source_document_id,
        date: payload.date,
        description: payload.description,
        lines: payload.lines,
        memo: payload.memo,
    };
    let outcome = state
        .blocking(move |journal| journal.submit(submission))
        .await?;

    let status = if outcome.duplicate {
        StatusCode::OK
    } else {
        info!(entry_id = %outcome.entry_id, caller = %caller.user_id, "source entry posted");
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(SubmitResponse {
            entry_id: outcome.entry_id,
            duplicate: outcome.duplicate,
            entry_number: outcome.entry_number.map(|n| n.to_string()),
        }),
    ))
}
