//! Partner client configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Where the client connects and how it retries
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the sync server, e.g. `http://localhost:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// File holding the paired session id
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Consecutive failed reconnects before giving up
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

impl ClientConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.initial_backoff_ms == 0 {
            return Err(ValidationError::MustBePositive("client.initial_backoff_ms"));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(ValidationError::InvalidBackoff);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_file: default_session_file(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".tandem/session.yaml")
}

fn default_initial_backoff() -> u64 {
    250
}

fn default_max_backoff() -> u64 {
    10_000
}

fn default_max_reconnect_attempts() -> u32 {
    8
}
