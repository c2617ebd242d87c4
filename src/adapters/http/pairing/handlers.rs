//! HTTP handlers for pairing endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{error_response, handle_pairing_error};
use crate::adapters::http::session::SessionResponse;
use crate::adapters::http::state::AppState;
use crate::application::handlers::RedeemCodeCommand;
use crate::domain::foundation::ErrorCode;

use super::dto::RedeemCodeRequest;

/// POST /api/pairing/redeem - Join a session by code
///
/// The code is consumed; a second redeem of the same code fails.
pub async fn redeem_code(
    State(state): State<AppState>,
    body: Result<Json<RedeemCodeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(ErrorCode::ValidationFailed, rejection.body_text());
        }
    };

    match state
        .redeem_code
        .handle(RedeemCodeCommand { code: req.code })
        .await
    {
        Ok(snapshot) => (StatusCode::OK, Json(SessionResponse::from(snapshot))).into_response(),
        Err(e) => handle_pairing_error(e),
    }
}
