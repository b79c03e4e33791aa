//! JSON API over the dealer entity store.
//!
//! Exposes fetch, mutation, analytics and preference actions to dashboard
//! clients. The store is seeded from a synthetic in-memory source and,
//! when `DEALER_DATABASE_URL` is set, restored from its SQLite snapshot.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use chrono::Utc;
use dealer_core::EntitySource;
use dealer_engine::DealerStore;
use mock_source::{DelayedSource, InMemorySource};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting dashboard API");

    // Build the data source
    let memory = InMemorySource::seeded(config.engine.seed, Utc::now());
    let source: Arc<dyn EntitySource> = if config.engine.latency.is_zero() {
        Arc::new(memory)
    } else {
        Arc::new(DelayedSource::new(memory, config.engine.latency))
    };

    // Build and hydrate the store
    let store = DealerStore::from_config(source, &config.engine).await?;
    let hydration = store.hydrate().await;
    info!(?hydration, source = store.source_name(), "Store ready");

    // Build router
    let app = routes::router().with_state(AppState::new(store));

    // Start server
    info!(addr = %config.addr, "Dashboard API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
