//!
//! Newsrank Server - HTTP surface for the best-stories service
//!

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// API module
pub mod api;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

// Re-export key types
pub use config::{load_config, ServerConfig};
pub use error::{ServerError, ServerResult};

use api::AppState;

/// Run the server with the given configuration
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    // Initialize logging
    init_logging(&config);

    config.validate()?;

    // Build the feed pipeline and the router around it
    let (stories, breaker) = newsrank_core::build_best_stories(&config.hacker_news)?;
    let state = AppState {
        stories: Arc::new(stories),
        breaker,
        max_items: config.hacker_news.max_items,
    };
    let app = api::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| ServerError::ConfigurationError(format!("invalid bind address: {e}")))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            warn!("Failed to listen for shutdown signal: {}", err);
            // Keep serving; shutting down now would be worse.
            std::future::pending::<()>().await;
        }
    }
}

/// Initialize logging
fn init_logging(config: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
