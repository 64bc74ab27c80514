//! Route definitions for the push API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::push;
use crate::state::AppState;

/// Request/response routes that complete quickly and sit behind the request
/// timeout.
///
/// ```text
/// GET    /api/config      -> get_config
/// POST   /api/subscribe   -> subscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(push::get_config))
        .route("/api/subscribe", post(push::subscribe))
}

/// The broadcast route. Its latency grows with wave count times interval, so
/// it is mounted outside the request timeout.
///
/// ```text
/// POST   /api/send        -> send
/// ```
pub fn broadcast_router() -> Router<AppState> {
    Router::new().route("/api/send", post(push::send))
}
