mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use std::sync::Arc;

use fulfillment::OpenAiProvider;
use ledger::MemoryLedger;
use matching_engine::MatchingEngine;
use router::create_router;
use state::AppState;
use tokio::net::TcpListener;

use config::GatewayConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting marketplace gateway service");

    let config = GatewayConfig::from_env()?;

    let store = Arc::new(MemoryLedger::new());
    let provider = Arc::new(OpenAiProvider::new(config.provider.clone()));
    let engine = Arc::new(MatchingEngine::new(store, provider));

    let app = create_router(AppState::new(engine));

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
