//! HTTP handlers for session endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{
    error_response, handle_pairing_error, handle_session_error, parse_session_id, status_for,
    ErrorResponse,
};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{GetSessionQuery, IssueCodeCommand, MutateDocumentCommand};
use crate::domain::document::{DocumentField, MutationRequest};
use crate::domain::foundation::ErrorCode;

use super::dto::{MutateResponse, PairingCodeResponse, SessionResponse};

/// POST /api/sessions - Create a session and its first pairing code
pub async fn create_session(State(state): State<AppState>) -> Response {
    match state.create_session.handle().await {
        Ok(result) => {
            let response = PairingCodeResponse::from(result.pairing);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_pairing_error(e),
    }
}

/// GET /api/sessions/:id - Current document and revision
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(e) => return handle_session_error(e),
    };

    match state.get_session.handle(GetSessionQuery { session_id }).await {
        Ok(snapshot) => (StatusCode::OK, Json(SessionResponse::from(snapshot))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/mutate - Apply one field mutation
pub async fn mutate_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(e) => return handle_session_error(e),
    };

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(ErrorCode::ValidationFailed, rejection.body_text());
        }
    };
    let request: MutationRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            let fields: Vec<&str> = DocumentField::ALL.iter().map(DocumentField::as_str).collect();
            let body = ErrorResponse::new(ErrorCode::InvalidMutation, e.to_string())
                .with_details(serde_json::json!({ "fields": fields }));
            return (status_for(ErrorCode::InvalidMutation), Json(body)).into_response();
        }
    };

    let cmd = MutateDocumentCommand {
        session_id,
        request,
    };

    match state.mutate_document.handle(cmd).await {
        Ok(snapshot) => {
            let response = MutateResponse {
                success: true,
                revision: snapshot.revision,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/pairing-code - Issue another pairing code
pub async fn issue_pairing_code(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(e) => return handle_session_error(e),
    };

    match state.issue_code.handle(IssueCodeCommand { session_id }).await {
        Ok(issued) => {
            (StatusCode::CREATED, Json(PairingCodeResponse::from(issued))).into_response()
        }
        Err(e) => handle_pairing_error(e),
    }
}
