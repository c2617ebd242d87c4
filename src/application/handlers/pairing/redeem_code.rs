//! RedeemCodeHandler - Command handler for joining a session by code.

use std::sync::Arc;

use super::errors::PairingFlowError;
use crate::domain::document::DocumentSnapshot;
use crate::domain::pairing::PairingError;
use crate::domain::session::SessionError;
use crate::ports::{PairingRegistry, SessionStore};

/// Command carrying the code exactly as the partner typed it.
#[derive(Debug, Clone)]
pub struct RedeemCodeCommand {
    pub code: String,
}

/// Handler for redeeming pairing codes.
pub struct RedeemCodeHandler {
    store: Arc<dyn SessionStore>,
    registry: Arc<dyn PairingRegistry>,
}

impl RedeemCodeHandler {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<dyn PairingRegistry>) -> Self {
        Self { store, registry }
    }

    /// Consumes the code and returns the session's current snapshot.
    pub async fn handle(&self, cmd: RedeemCodeCommand) -> Result<DocumentSnapshot, PairingFlowError> {
        let session_id = self.registry.redeem(&cmd.code).await?;

        match self.store.get(&session_id).await {
            Ok(snapshot) => Ok(snapshot),
            Err(SessionError::NotFound(_)) => Err(PairingError::CodeNotFound.into()),
            Err(err) => Err(err.into()),
        }
    }
}
