//! Errors raised while validating or applying a field mutation.

use thiserror::Error;

use super::mutation::OperationKind;
use super::shared_document::DocumentField;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("operation '{operation}' is not supported on field '{field}'")]
    UnsupportedOperation {
        field: DocumentField,
        operation: OperationKind,
    },

    #[error("invalid payload for field '{field}': {reason}")]
    InvalidPayload { field: DocumentField, reason: String },

    #[error("counter '{field}' would overflow")]
    CounterOverflow { field: DocumentField },
}

impl DocumentError {
    pub fn unsupported(field: DocumentField, operation: OperationKind) -> Self {
        DocumentError::UnsupportedOperation { field, operation }
    }

    pub fn invalid_payload(field: DocumentField, reason: impl Into<String>) -> Self {
        DocumentError::InvalidPayload {
            field,
            reason: reason.into(),
        }
    }
}
