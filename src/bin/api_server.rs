// API Server Binary Entry Point
//
// Purpose: Serve the daily word view as JSON for the page renderer
// Usage: cargo run --features api --bin api_server

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zengo_daily::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "zengo_daily=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = Config::from_env();
    config.validate()?;

    tracing::info!("Configuration:");
    tracing::info!("  BASE_URL: {}", config.base_url);
    tracing::info!("  ZEN_WORDS_URL: {}", config.zen_words_url);
    tracing::info!("  SEKKI_DATA_URL: {}", config.sekki_data_url);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!(
        "  FETCH: {} attempts, {}ms timeout",
        config.retry.max_attempts,
        config.retry.attempt_timeout.as_millis()
    );

    let state = AppState::new(&config)?;

    // Warm the caches so the first page view does not wait on the network
    let warm = state.service.today().await;
    tracing::info!(
        "Warm-up view for {}: {}/{}",
        warm.date,
        warm.index.map(|i| i + 1).unwrap_or(0),
        warm.total
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
