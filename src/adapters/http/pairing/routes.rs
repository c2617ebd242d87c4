//! HTTP routes for pairing endpoints.

use axum::{routing::post, Router};

use super::handlers::redeem_code;
use crate::adapters::http::state::AppState;

/// Mounted under `/api/pairing`.
pub fn pairing_routes() -> Router<AppState> {
    Router::new().route("/redeem", post(redeem_code))
}
