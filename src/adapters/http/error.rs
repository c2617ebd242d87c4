//! Error responses shared by every endpoint.
//!
//! All failures are returned as `{"code": ..., "message": ...}` with the
//! status derived from the code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::handlers::PairingFlowError;
use crate::domain::foundation::{ErrorCode, SessionId};
use crate::domain::session::SessionError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// HTTP status for each client-visible error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidMutation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::CodeNotFound | ErrorCode::SessionNotFound => StatusCode::NOT_FOUND,
        ErrorCode::CodeSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    (status_for(code), Json(ErrorResponse::new(code, message))).into_response()
}

/// Parses a path segment as a session id.
///
/// Anything unparseable cannot name a live session, so it is reported as
/// not found rather than as a bad request.
pub fn parse_session_id(raw: &str) -> Result<SessionId, SessionError> {
    raw.parse::<SessionId>()
        .map_err(|_| SessionError::not_found(raw))
}

pub fn handle_session_error(error: SessionError) -> Response {
    if let SessionError::Infrastructure(msg) = &error {
        tracing::error!(error = %msg, "Session store failure");
    }
    error_response(error.code(), error.message())
}

pub fn handle_pairing_error(error: PairingFlowError) -> Response {
    match error {
        PairingFlowError::Session(err) => handle_session_error(err),
        PairingFlowError::Pairing(err) => {
            if err.code() == ErrorCode::CodeSpaceExhausted {
                tracing::warn!(error = %err, "Pairing code space exhausted");
            }
            error_response(err.code(), err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{DocumentError, DocumentField};
    use crate::domain::pairing::PairingError;

    #[test]
    fn session_not_found_maps_to_404() {
        let response = handle_session_error(SessionError::not_found(SessionId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_mutation_maps_to_422() {
        let error = SessionError::InvalidMutation(DocumentError::invalid_payload(
            DocumentField::Wishes,
            "text cannot be empty",
        ));
        let response = handle_session_error(error);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn code_not_found_maps_to_404() {
        let response = handle_pairing_error(PairingError::CodeNotFound.into());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn exhausted_code_space_maps_to_503() {
        let response =
            handle_pairing_error(PairingError::CodeSpaceExhausted { attempts: 16 }.into());
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn garbage_session_id_is_not_found() {
        assert!(matches!(
            parse_session_id("not-a-session"),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn error_response_uses_screaming_snake_codes() {
        let error = ErrorResponse::new(ErrorCode::CodeNotFound, "Pairing code not found");
        assert_eq!(error.code, "CODE_NOT_FOUND");
        assert!(error.details.is_none());
    }
}
