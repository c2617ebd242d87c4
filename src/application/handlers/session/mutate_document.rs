//! MutateDocumentHandler - Command handler for changing one document field.

use std::sync::Arc;

use crate::domain::document::{DocumentSnapshot, FieldMutation, MutationRequest};
use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;
use crate::ports::{Clock, SessionStore};

/// Command to apply one field mutation.
#[derive(Debug, Clone)]
pub struct MutateDocumentCommand {
    pub session_id: SessionId,
    pub request: MutationRequest,
}

/// Handler for document mutations.
///
/// Validates the request against the field's type before the session is
/// touched, so an invalid request never changes the document.
pub struct MutateDocumentHandler {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl MutateDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the snapshot the session ended at.
    pub async fn handle(&self, cmd: MutateDocumentCommand) -> Result<DocumentSnapshot, SessionError> {
        let mutation = FieldMutation::from_request(cmd.request, self.clock.now())?;
        self.store.mutate(&cmd.session_id, &mutation).await
    }
}
