//! IssueCodeHandler - Command handler for issuing another pairing code.
//!
//! Used when the first code expired before the partner typed it in.

use std::sync::Arc;

use super::errors::PairingFlowError;
use crate::domain::foundation::SessionId;
use crate::ports::{IssuedCode, PairingRegistry, SessionStore};

#[derive(Debug, Clone)]
pub struct IssueCodeCommand {
    pub session_id: SessionId,
}

pub struct IssueCodeHandler {
    store: Arc<dyn SessionStore>,
    registry: Arc<dyn PairingRegistry>,
}

impl IssueCodeHandler {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<dyn PairingRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn handle(&self, cmd: IssueCodeCommand) -> Result<IssuedCode, PairingFlowError> {
        // Codes must only ever point at live sessions
        self.store.get(&cmd.session_id).await?;

        let issued = self.registry.issue(cmd.session_id).await?;
        Ok(issued)
    }
}
