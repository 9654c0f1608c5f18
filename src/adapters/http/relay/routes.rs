//! Axum router for the relay endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{get_history, health, receive_chat, RelayAppState};

/// # Routes
///
/// - `GET /` - health and pending batch count
/// - `POST /chat` - queue an inbound message
/// - `GET /history/:recipient` - message log for one number
pub fn relay_routes() -> Router<RelayAppState> {
    Router::new()
        .route("/", get(health))
        .route("/chat", post(receive_chat))
        .route("/history/:recipient", get(get_history))
}

/// The complete relay application with tracing and a request timeout.
pub fn relay_router(state: RelayAppState, request_timeout: Duration) -> Router {
    relay_routes()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
