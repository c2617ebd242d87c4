//! Session-specific error types.

use crate::domain::document::DocumentError;
use crate::domain::foundation::ErrorCode;

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No session with this identifier (never existed, garbage input, or
    /// forgotten by a restart).
    NotFound(String),
    /// The mutation does not fit the field it targets.
    InvalidMutation(DocumentError),
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: impl ToString) -> Self {
        SessionError::NotFound(id.to_string())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::InvalidMutation(_) => ErrorCode::InvalidMutation,
            SessionError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(id) => format!("Session not found: {}", id),
            SessionError::InvalidMutation(err) => format!("Invalid mutation: {}", err),
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DocumentError> for SessionError {
    fn from(err: DocumentError) -> Self {
        SessionError::InvalidMutation(err)
    }
}
