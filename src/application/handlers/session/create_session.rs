//! CreateSessionHandler - Command handler for starting a paired session.

use std::sync::Arc;

use crate::application::handlers::pairing::PairingFlowError;
use crate::domain::document::DocumentSnapshot;
use crate::ports::{IssuedCode, PairingRegistry, SessionStore};

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub snapshot: DocumentSnapshot,
    pub pairing: IssuedCode,
}

/// Handler for creating sessions.
///
/// Every new session comes with a pairing code so the creator can invite
/// a partner straight away.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
    registry: Arc<dyn PairingRegistry>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<dyn PairingRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn handle(&self) -> Result<CreateSessionResult, PairingFlowError> {
        let snapshot = self.store.create().await?;
        let pairing = self.registry.issue(snapshot.session_id).await?;

        Ok(CreateSessionResult { snapshot, pairing })
    }
}
