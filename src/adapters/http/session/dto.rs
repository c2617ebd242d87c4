//! Request and response bodies for session endpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::document::{DocumentSnapshot, SharedDocument};
use crate::ports::IssuedCode;

/// Response for a freshly issued pairing code (session creation included).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingCodeResponse {
    pub session_id: String,
    pub pairing_code: String,
    pub expires_at: String,
}

impl From<IssuedCode> for PairingCodeResponse {
    fn from(issued: IssuedCode) -> Self {
        Self {
            session_id: issued.session_id.to_string(),
            pairing_code: issued.code.to_string(),
            expires_at: issued.expires_at.to_rfc3339(),
        }
    }
}

/// Current state of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub revision: u64,
    pub document: Arc<SharedDocument>,
}

impl From<DocumentSnapshot> for SessionResponse {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id.to_string(),
            revision: snapshot.revision,
            document: snapshot.document,
        }
    }
}

/// Acknowledgement of an accepted mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutateResponse {
    pub success: bool,
    /// Revision the session is at after the mutation.
    pub revision: u64,
}
