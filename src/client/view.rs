//! What the partner UI renders.

use crate::domain::document::SharedDocument;
use crate::domain::foundation::SessionId;

use super::errors::ClientError;

/// State of the live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No subscription (unpaired, logged out, or retries exhausted).
    #[default]
    Disconnected,
    /// Opening or re-opening the subscription.
    Connecting,
    /// Receiving snapshots.
    Live,
}

/// Everything a screen needs, published on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientView {
    /// `None` while unpaired.
    pub session_id: Option<SessionId>,
    pub connection: ConnectionState,
    /// Revision of the last confirmed snapshot.
    pub revision: u64,
    /// Confirmed document with pending local edits applied.
    pub document: SharedDocument,
    pub pending_edits: usize,
    pub last_error: Option<ClientError>,
}

impl ClientView {
    pub fn is_paired(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.connection == ConnectionState::Live
    }
}
