use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use extractor::config::Config;
use extractor::extraction::TextExtractor;
use extractor::llm_client::build_completer;
use extractor::routes::build_router;
use extractor::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting extractor API v{}", env!("CARGO_PKG_VERSION"));

    if config.cache_responses {
        warn!("CACHE_RESPONSES is set but response caching is not supported; every request calls the provider");
    }

    // Initialize the provider client
    let completer = build_completer(&config.llm).context("failed to build LLM client")?;
    info!(
        provider = %config.llm.provider,
        model = %config.extractor.model,
        timeout_secs = config.llm.timeout.map(|t| t.as_secs()),
        "LLM client initialized"
    );

    let text = TextExtractor::new(completer, config.extractor.clone())
        .context("invalid extractor settings")?;

    // Build app state
    let state = AppState::new(text);

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
