//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes over a shared [`Journal`]
//! - Caller identity middleware
//! - The JSON error envelope

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use journal_core::Journal;
use journal_core::ledger::LedgerError;
use journal_shared::AppError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger.
    pub journal: Arc<Journal>,
}

impl AppState {
    /// Wraps a journal.
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal: Arc::new(journal),
        }
    }

    /// Runs a journal call that can wait on a period lock or the entry log
    /// on the blocking pool, keeping the async workers free.
    pub async fn blocking<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Journal) -> Result<T, LedgerError> + Send + 'static,
        T: Send + 'static,
    {
        let journal = Arc::clone(&self.journal);
        tokio::task::spawn_blocking(move || call(&journal))
            .await
            .map_err(|err| AppError::Internal(format!("journal task failed: {err}")))?
            .map_err(ApiError::from)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
