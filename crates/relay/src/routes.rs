//! Subscriber-facing HTTP surface: the WebSocket upgrade at `/` and a
//! health probe.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::ws;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Current number of live subscribers.
    pub subscribers: usize,
}

/// GET /health -- returns service status and subscriber count.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        subscribers: state.registry.connection_count().await,
    })
}

/// Build the subscriber-side router.
///
/// The upgrade lives at `/` so dashboards connect with a bare
/// `ws://host:port` URL.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ws::ws_handler))
        .route("/health", get(health_check))
}
