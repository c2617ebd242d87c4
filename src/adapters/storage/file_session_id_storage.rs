//! File-based Session Id Storage Adapter
//!
//! Keeps the paired session id in a small YAML file so a client restart
//! reconnects to the same session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionIdStorage, SessionIdStorageError};

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    session_id: SessionId,
    saved_at: Timestamp,
}

/// File-based storage for the paired session id
#[derive(Debug, Clone)]
pub struct FileSessionIdStorage {
    path: PathBuf,
}

impl FileSessionIdStorage {
    /// # Example
    /// ```ignore
    /// let storage = FileSessionIdStorage::new(".tandem/session.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionIdStorage for FileSessionIdStorage {
    async fn load(&self) -> Result<Option<SessionId>, SessionIdStorageError> {
        let yaml = match fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionIdStorageError::IoError(e.to_string())),
        };

        let stored: StoredSession = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionIdStorageError::DeserializationFailed(e.to_string()))?;

        Ok(Some(stored.session_id))
    }

    async fn save(&self, session_id: &SessionId) -> Result<(), SessionIdStorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| SessionIdStorageError::IoError(e.to_string()))?;
        }

        let yaml = serde_yaml::to_string(&StoredSession {
            session_id: *session_id,
            saved_at: Timestamp::now(),
        })
        .map_err(|e| SessionIdStorageError::SerializationFailed(e.to_string()))?;

        fs::write(&self.path, yaml)
            .await
            .map_err(|e| SessionIdStorageError::IoError(e.to_string()))
    }

    async fn clear(&self) -> Result<(), SessionIdStorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionIdStorageError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_without_file_is_unpaired() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionIdStorage::new(temp_dir.path().join("session.yaml"));

        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_returns_same_id() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionIdStorage::new(temp_dir.path().join("nested/dir/session.yaml"));
        let session_id = SessionId::new();

        storage.save(&session_id).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(session_id));
        let contents = std::fs::read_to_string(storage.path()).unwrap();
        assert!(contents.contains("sessionId"));
    }

    #[tokio::test]
    async fn clear_forgets_id_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionIdStorage::new(temp_dir.path().join("session.yaml"));
        storage.save(&SessionId::new()).await.unwrap();

        storage.clear().await.unwrap();
        storage.clear().await.unwrap();

        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.yaml");
        std::fs::write(&path, "sessionId: [not, a, uuid]").unwrap();
        let storage = FileSessionIdStorage::new(&path);

        assert!(matches!(
            storage.load().await,
            Err(SessionIdStorageError::DeserializationFailed(_))
        ));
    }
}
