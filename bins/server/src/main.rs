//! Journal ledger API server.
//!
//! Main entry point for the ledger service.

mod bootstrap;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use journal_api::{AppState, create_router};
use journal_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let journal = bootstrap::build_journal(&config.ledger)?;
    info!(
        accounts = journal.accounts().len(),
        periods = journal.periods().len(),
        templates = journal.templates().len(),
        "Ledger seeded"
    );

    let app = create_router(AppState::new(journal));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
