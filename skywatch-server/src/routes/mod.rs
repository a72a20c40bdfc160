//! HTTP route handlers.

pub mod health;
pub mod weather;

use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{IngestHandler, QueryHandler};

pub use health::{health, ready};
pub use weather::{history, ingest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestHandler,
    pub query: QueryHandler,
    pub started_at: Instant,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Weather
        .route("/ingest", post(ingest))
        .route("/weather", get(history))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
