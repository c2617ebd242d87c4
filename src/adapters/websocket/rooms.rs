//! Subscriber rooms for per-session snapshot fan-out.
//!
//! Each session owns one [`Room`]. A room holds the sending half of every
//! attached subscriber channel; publishing pushes one snapshot into each
//! of them without waiting.
//!
//! # Architecture
//!
//! ```text
//! Room: session-123         Room: session-456
//! ├── channel-a (queue 64)  ├── channel-d
//! ├── channel-b             └── channel-e
//! └── channel-c
//! ```
//!
//! A channel whose queue is full is evicted rather than waited on, so one
//! stalled partner never holds up the other. The evicted client sees its
//! stream end and reconnects for a fresh snapshot.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::document::DocumentSnapshot;
use crate::domain::foundation::ChannelId;

/// Outcome of one publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub evicted: usize,
}

/// The subscriber set of one session.
///
/// Not synchronised on its own: the owning session serialises access, which
/// is also what keeps snapshot order identical across subscribers.
#[derive(Debug)]
pub struct Room {
    subscribers: HashMap<ChannelId, mpsc::Sender<DocumentSnapshot>>,
    channel_capacity: usize,
}

impl Room {
    /// Create a room whose channels buffer up to `channel_capacity` snapshots.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            subscribers: HashMap::new(),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Attach a new channel, seeded with `current` as its first snapshot.
    pub fn attach(
        &mut self,
        current: DocumentSnapshot,
    ) -> (ChannelId, mpsc::Receiver<DocumentSnapshot>) {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        // Fresh channel with capacity >= 1: cannot be full or closed.
        let _ = tx.try_send(current);

        let channel_id = ChannelId::new();
        self.subscribers.insert(channel_id, tx);
        (channel_id, rx)
    }

    /// Remove a channel. Returns false if it was not attached.
    pub fn detach(&mut self, channel_id: &ChannelId) -> bool {
        self.subscribers.remove(channel_id).is_some()
    }

    /// Push `snapshot` to every attached channel.
    pub fn publish(&mut self, snapshot: &DocumentSnapshot) -> PublishReport {
        let mut report = PublishReport::default();

        self.subscribers
            .retain(|channel_id, tx| match tx.try_send(snapshot.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        channel_id = %channel_id,
                        session_id = %snapshot.session_id,
                        revision = snapshot.revision,
                        "Subscriber queue full, evicting channel"
                    );
                    report.evicted += 1;
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        channel_id = %channel_id,
                        session_id = %snapshot.session_id,
                        "Subscriber gone, removing channel"
                    );
                    report.evicted += 1;
                    false
                }
            });

        report
    }

    /// Number of attached channels.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
