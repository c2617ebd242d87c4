//! SubscribeSessionHandler - opens a live channel on a session.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;
use crate::ports::{ChannelHandle, SessionStore};

#[derive(Debug, Clone)]
pub struct SubscribeSessionCommand {
    pub session_id: SessionId,
}

pub struct SubscribeSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl SubscribeSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The returned channel yields the current snapshot first.
    pub async fn handle(&self, cmd: SubscribeSessionCommand) -> Result<ChannelHandle, SessionError> {
        let channel = self.store.subscribe(&cmd.session_id).await?;
        tracing::info!(
            session_id = %cmd.session_id,
            channel_id = %channel.id(),
            "Subscriber channel opened"
        );
        Ok(channel)
    }
}
