//! Subscriber channel port - the receiving end of one push connection.
//!
//! A [`ChannelHandle`] is what `SessionStore::subscribe` hands out. The
//! store keeps only the sending half; the handle keeps a weak reference
//! back to its owner so closing the channel deregisters it without the
//! owner having to outlive the connection.

use std::sync::Weak;

use tokio::sync::mpsc;

use crate::domain::document::DocumentSnapshot;
use crate::domain::foundation::{ChannelId, SessionId, StateMachine};

/// Lifecycle of one subscriber channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Registered, first snapshot not yet delivered.
    Connecting,
    /// At least one snapshot delivered.
    Open,
    /// Deregistered. A reconnect gets a new channel.
    Closed,
}

impl StateMachine for ChannelState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ChannelState::*;
        matches!(
            (self, target),
            (Connecting, Open) | (Connecting, Closed) | (Open, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ChannelState::*;
        match self {
            Connecting => vec![Open, Closed],
            Open => vec![Closed],
            Closed => vec![],
        }
    }
}

/// Whoever holds the subscriber set a channel is registered in.
pub trait ChannelOwner: Send + Sync {
    /// Removes the channel. Must be idempotent.
    fn detach(&self, channel_id: &ChannelId);
}

/// Receiving end of a subscription. Dropping it unsubscribes.
pub struct ChannelHandle {
    id: ChannelId,
    session_id: SessionId,
    state: ChannelState,
    events: mpsc::Receiver<DocumentSnapshot>,
    owner: Weak<dyn ChannelOwner>,
}

impl ChannelHandle {
    pub fn new(
        id: ChannelId,
        session_id: SessionId,
        events: mpsc::Receiver<DocumentSnapshot>,
        owner: Weak<dyn ChannelOwner>,
    ) -> Self {
        Self {
            id,
            session_id,
            state: ChannelState::Connecting,
            events,
            owner,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the channel is closed: either the owner evicted
    /// it or the session is gone.
    pub async fn recv(&mut self) -> Option<DocumentSnapshot> {
        if self.state == ChannelState::Closed {
            return None;
        }
        match self.events.recv().await {
            Some(snapshot) => {
                if let Ok(next) = self.state.transition_to(ChannelState::Open) {
                    self.state = next;
                }
                Some(snapshot)
            }
            None => {
                self.close();
                None
            }
        }
    }

    /// Deregisters the channel. Safe to call more than once.
    pub fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = ChannelState::Closed;
        self.events.close();
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(&self.id);
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("id", &self.id)
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .finish()
    }
}
