mod config;
mod diary;
mod enrichment;
mod errors;
mod llm_client;
mod models;
mod patients;
mod routes;
mod screening;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enrichment::spawn_enrichment_workers;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::postgres::PgEntryStore;
use crate::storage::EntryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Anima API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let store: Arc<dyn EntryStore> =
        Arc::new(PgEntryStore::connect(&config.database_url).await?);

    // Initialize the generation client
    let generator = Arc::new(OllamaClient::new(
        config.generation_base_url.clone(),
        config.generation_model.clone(),
    ));
    info!(
        "Generation client initialized (model: {})",
        config.generation_model
    );

    // Start the background enrichment worker pool
    let enrichment = spawn_enrichment_workers(store.clone(), generator, config.enrichment_workers);

    // Build app state
    let state = AppState { store, enrichment };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
