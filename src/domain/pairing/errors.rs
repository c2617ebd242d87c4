//! Pairing-specific error types.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// The code was never issued, was already redeemed, or has expired.
    /// Callers cannot tell which.
    #[error("Pairing code not found")]
    CodeNotFound,

    /// Could not draw an unused code.
    #[error("Could not allocate a pairing code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
}

impl PairingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PairingError::CodeNotFound => ErrorCode::CodeNotFound,
            PairingError::CodeSpaceExhausted { .. } => ErrorCode::CodeSpaceExhausted,
        }
    }
}
