//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_session, get_session, issue_pairing_code, mutate_session};
use crate::adapters::http::state::AppState;
use crate::adapters::websocket::subscribe_handler;

/// Creates the session router with all endpoints.
///
/// Mounted under `/api/sessions`.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/mutate", post(mutate_session))
        .route("/:id/pairing-code", post(issue_pairing_code))
        .route("/:id/subscribe", get(subscribe_handler))
}
