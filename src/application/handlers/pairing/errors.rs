//! Errors for flows that touch both the pairing registry and the session store.

use crate::domain::foundation::ErrorCode;
use crate::domain::pairing::PairingError;
use crate::domain::session::SessionError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PairingFlowError {
    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl PairingFlowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PairingFlowError::Pairing(err) => err.code(),
            PairingFlowError::Session(err) => err.code(),
        }
    }
}
