//! Errors surfaced by the partner client.

use thiserror::Error;

use crate::ports::{SessionIdStorageError, SyncApiError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Pairing code not found")]
    CodeNotFound,

    /// The stored session no longer exists on the server.
    #[error("Session not found")]
    SessionNotFound,

    #[error("Not paired with a session")]
    NotPaired,

    #[error("Not connected to the session")]
    Disconnected,

    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<SyncApiError> for ClientError {
    fn from(err: SyncApiError) -> Self {
        match err {
            SyncApiError::CodeNotFound => ClientError::CodeNotFound,
            SyncApiError::SessionNotFound => ClientError::SessionNotFound,
            SyncApiError::InvalidMutation(msg) => ClientError::InvalidMutation(msg),
            SyncApiError::Transport(msg) => ClientError::Transport(msg),
        }
    }
}

impl From<SessionIdStorageError> for ClientError {
    fn from(err: SessionIdStorageError) -> Self {
        ClientError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_one_to_one() {
        assert_eq!(
            ClientError::from(SyncApiError::SessionNotFound),
            ClientError::SessionNotFound
        );
        assert_eq!(
            ClientError::from(SyncApiError::InvalidMutation("bad".into())),
            ClientError::InvalidMutation("bad".into())
        );
    }

    #[test]
    fn storage_errors_keep_their_message() {
        let err = ClientError::from(SessionIdStorageError::IoError("disk full".into()));
        assert!(err.to_string().contains("disk full"));
    }
}
