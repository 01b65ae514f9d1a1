mod config;
mod errors;
mod llm_client;
mod reply;
mod routes;
mod state;
mod stats;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::stats::InMemoryStats;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TextSense API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        // Keep serving /health and /stats; generation requests will fail
        // with a configuration error until the key is provided.
        warn!("GEMINI_API_KEY is not set; /generate_reply will return configuration errors");
    }

    let gateway = GeminiClient::new(config.gemini_api_key.clone(), !config.disable_safety);
    info!(
        "Gemini gateway initialized (safety filtering: {})",
        if config.disable_safety { "off" } else { "on" }
    );

    let state = AppState {
        gateway: Arc::new(gateway),
        stats: Arc::new(InMemoryStats::new()),
    };

    // Permissive CORS is deliberate: this is a public-facing demo API.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
