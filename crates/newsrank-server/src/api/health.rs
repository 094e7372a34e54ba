//! Health check endpoint for the newsrank server

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use super::AppState;

/// Health check handler
///
/// Reports process liveness and the current circuit-breaker state. The
/// upstream itself is never probed here.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let circuit = state.breaker.state().await;

    Json(json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "circuit": circuit.to_string(),
    }))
}
