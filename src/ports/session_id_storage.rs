//! Session Id Storage Port - where a client remembers which session it joined.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionIdStorageError {
    #[error("Failed to serialize session id: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session id: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting the single session id a client is paired with.
#[async_trait]
pub trait SessionIdStorage: Send + Sync {
    /// Returns the stored id, or `None` if the client is unpaired.
    async fn load(&self) -> Result<Option<SessionId>, SessionIdStorageError>;

    /// Replaces the stored id.
    async fn save(&self, session_id: &SessionId) -> Result<(), SessionIdStorageError>;

    /// Forgets the stored id. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), SessionIdStorageError>;
}
