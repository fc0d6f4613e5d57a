//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::identity_middleware};

pub mod accounts;
pub mod entries;
pub mod health;
pub mod periods;
pub mod sources;
pub mod templates;

/// Creates the API router with all routes.
///
/// Everything except the health check requires a caller identity.
pub fn api_routes() -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(sources::routes())
        .merge(entries::routes())
        .merge(periods::routes())
        .merge(accounts::routes())
        .merge(templates::routes())
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
