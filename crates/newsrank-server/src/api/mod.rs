//! API routes and handlers for the newsrank server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use newsrank_core::{BestStoriesService, CircuitBreaker};

pub mod errors;
pub mod health;
pub mod stories;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// The aggregation service
    pub stories: Arc<BestStoriesService>,

    /// Breaker handle, read by the health endpoint
    pub breaker: Arc<CircuitBreaker>,

    /// Upper bound on `n` for a single request
    pub max_items: usize,
}

/// Build the router for API endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/stories/best", get(stories::get_best_stories))
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
