//! Full API router.

use axum::Router;

use super::health;
use super::pairing::pairing_routes;
use super::session::session_routes;
use super::state::AppState;

/// Builds every route the server exposes.
///
/// Cross-cutting layers (tracing, CORS, timeouts) are added by the caller.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/sessions", session_routes())
        .nest("/api/pairing", pairing_routes())
        .with_state(state)
}
