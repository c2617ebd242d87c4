//! GetSessionHandler - Query handler for a session's current snapshot.

use std::sync::Arc;

use crate::domain::document::DocumentSnapshot;
use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;
use crate::ports::SessionStore;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving the current document.
///
/// Clients call this on startup to check that a stored session id still
/// refers to a live session.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<DocumentSnapshot, SessionError> {
        self.store.get(&query.session_id).await
    }
}
