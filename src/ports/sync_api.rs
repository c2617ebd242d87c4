//! Sync API Port - the client's view of the sync server.
//!
//! The reconciler talks to the server only through this trait, so it can be
//! driven by a scripted fake in tests and by HTTP plus WebSocket in
//! production.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::document::{DocumentSnapshot, MutationRequest};
use crate::domain::foundation::{SessionId, Timestamp};

/// Result of creating a session or asking for a fresh code.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingInvite {
    pub session_id: SessionId,
    pub pairing_code: String,
    pub expires_at: Timestamp,
}

/// Live snapshots for one subscription. Ends when the server closes it.
pub type SnapshotStream = BoxStream<'static, Result<DocumentSnapshot, SyncApiError>>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncApiError {
    #[error("Pairing code not found")]
    CodeNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl SyncApiError {
    /// True for failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncApiError::Transport(_))
    }
}

#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Creates a session and returns its first pairing code.
    async fn create_session(&self) -> Result<PairingInvite, SyncApiError>;

    /// Issues another pairing code for an existing session.
    async fn issue_code(&self, session_id: &SessionId) -> Result<PairingInvite, SyncApiError>;

    /// Redeems a code and returns the session's current snapshot.
    async fn redeem_code(&self, code: &str) -> Result<DocumentSnapshot, SyncApiError>;

    /// Fetches the current snapshot.
    async fn get_session(&self, session_id: &SessionId) -> Result<DocumentSnapshot, SyncApiError>;

    /// Submits one mutation. Returns the revision the server ended at.
    async fn mutate(
        &self,
        session_id: &SessionId,
        request: &MutationRequest,
    ) -> Result<u64, SyncApiError>;

    /// Opens a live subscription. The first item is the current snapshot.
    async fn subscribe(&self, session_id: &SessionId) -> Result<SnapshotStream, SyncApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_api_is_object_safe() {
        fn _accepts_dyn(_api: &dyn SyncApi) {}
    }

    #[test]
    fn only_transport_errors_are_transient() {
        assert!(SyncApiError::Transport("reset".into()).is_transient());
        assert!(!SyncApiError::SessionNotFound.is_transient());
        assert!(!SyncApiError::CodeNotFound.is_transient());
    }
}
