//! Error vocabulary shared by the domain and the HTTP surface.

use std::fmt;
use thiserror::Error;

/// A value failed construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable error codes carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Request body unreadable.
    ValidationFailed,
    /// Mutation does not fit its field.
    InvalidMutation,
    /// Unknown, expired or already redeemed.
    CodeNotFound,
    SessionNotFound,
    /// No unused code could be drawn.
    CodeSpaceExhausted,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidMutation => "INVALID_MUTATION",
            ErrorCode::CodeNotFound => "CODE_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::CodeSpaceExhausted => "CODE_SPACE_EXHAUSTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_in_screaming_snake_case() {
        assert_eq!(ErrorCode::SessionNotFound.to_string(), "SESSION_NOT_FOUND");
        assert_eq!(ErrorCode::CodeSpaceExhausted.to_string(), "CODE_SPACE_EXHAUSTED");
    }

    #[test]
    fn invalid_format_names_field_and_reason() {
        let err = ValidationError::invalid_format("payload", "expected an object");

        assert_eq!(
            err.to_string(),
            "Field 'payload' has invalid format: expected an object"
        );
    }
}
