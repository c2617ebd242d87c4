//! In-memory Session Id Storage Adapter

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionIdStorage, SessionIdStorageError};

/// Keeps the session id for the lifetime of the process (tests, demos).
#[derive(Debug, Default)]
pub struct InMemorySessionIdStorage {
    session_id: Mutex<Option<SessionId>>,
}

impl InMemorySessionIdStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out paired with `session_id`.
    pub fn with_session(session_id: SessionId) -> Self {
        Self {
            session_id: Mutex::new(Some(session_id)),
        }
    }
}

#[async_trait]
impl SessionIdStorage for InMemorySessionIdStorage {
    async fn load(&self) -> Result<Option<SessionId>, SessionIdStorageError> {
        Ok(*self.session_id.lock())
    }

    async fn save(&self, session_id: &SessionId) -> Result<(), SessionIdStorageError> {
        *self.session_id.lock() = Some(*session_id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionIdStorageError> {
        *self.session_id.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear() {
        let storage = InMemorySessionIdStorage::new();
        let session_id = SessionId::new();

        storage.save(&session_id).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(session_id));

        storage.clear().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
    }
}
