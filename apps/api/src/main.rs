mod config;
mod errors;
mod export;
mod llm_client;
mod parsing;
mod pipeline;
mod retrieval;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::OutputStore;
use crate::llm_client::LlmClient;
use crate::retrieval::PubMedScraper;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Trialsift API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        &config.openrouter_api_url,
        config.openrouter_api_key.clone(),
        config.model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize article source
    let scraper = PubMedScraper::new(
        &config.base_url,
        Duration::from_millis(config.article_delay_ms),
        Duration::from_millis(config.page_delay_ms),
    )?;
    info!("Article source initialized ({})", config.base_url);

    let store = OutputStore::new(&config.output_dir);
    info!("Writing run artifacts under {}", store.root().display());

    // Build app state
    let state = AppState {
        config: config.clone(),
        source: Arc::new(scraper),
        generator: Arc::new(llm),
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
