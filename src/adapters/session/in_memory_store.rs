//! In-memory session store with per-session fan-out.
//!
//! # Concurrency
//!
//! The session map sits behind an `RwLock` that is only written on create.
//! Each session has its own mutex guarding document, revision and room
//! together, so mutations to different sessions never contend and a
//! mutation's apply, revision bump and publish happen as one step. Because
//! publishing never waits, the lock is held only for the time it takes to
//! enqueue into each subscriber's buffer.
//!
//! Documents are kept behind an `Arc` and cloned on write, so a snapshot
//! handed to subscribers is never copied again.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::adapters::websocket::rooms::Room;
use crate::domain::document::{DocumentSnapshot, FieldMutation, SharedDocument};
use crate::domain::foundation::{ChannelId, SessionId};
use crate::domain::session::SessionError;
use crate::ports::{ChannelHandle, ChannelOwner, SessionStore};

struct SessionState {
    document: Arc<SharedDocument>,
    revision: u64,
    room: Room,
}

impl SessionState {
    fn snapshot(&self, session_id: SessionId) -> DocumentSnapshot {
        DocumentSnapshot {
            session_id,
            revision: self.revision,
            document: Arc::clone(&self.document),
        }
    }
}

struct SessionEntry {
    id: SessionId,
    state: Mutex<SessionState>,
}

impl ChannelOwner for SessionEntry {
    fn detach(&self, channel_id: &ChannelId) {
        if self.state.lock().room.detach(channel_id) {
            tracing::debug!(session_id = %self.id, channel_id = %channel_id, "Subscriber detached");
        }
    }
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
    channel_capacity: usize,
}

impl InMemorySessionStore {
    /// `channel_capacity` is the number of snapshots a subscriber may fall
    /// behind before it is evicted.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    fn entry(&self, id: &SessionId) -> Result<Arc<SessionEntry>, SessionError> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::not_found(id))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<DocumentSnapshot, SessionError> {
        let id = SessionId::new();
        let state = SessionState {
            document: Arc::new(SharedDocument::default()),
            revision: 0,
            room: Room::new(self.channel_capacity),
        };
        let snapshot = state.snapshot(id);

        self.sessions.write().insert(
            id,
            Arc::new(SessionEntry {
                id,
                state: Mutex::new(state),
            }),
        );

        tracing::info!(session_id = %id, "Session created");
        Ok(snapshot)
    }

    async fn get(&self, id: &SessionId) -> Result<DocumentSnapshot, SessionError> {
        let entry = self.entry(id)?;
        let snapshot = entry.state.lock().snapshot(entry.id);
        Ok(snapshot)
    }

    async fn mutate(
        &self,
        id: &SessionId,
        mutation: &FieldMutation,
    ) -> Result<DocumentSnapshot, SessionError> {
        let entry = self.entry(id)?;
        let mut state = entry.state.lock();

        let outcome = mutation.apply(Arc::make_mut(&mut state.document))?;
        if !outcome.is_applied() {
            tracing::debug!(
                session_id = %entry.id,
                field = %mutation.field(),
                "Mutation left document unchanged"
            );
            return Ok(state.snapshot(entry.id));
        }

        state.revision += 1;
        let snapshot = state.snapshot(entry.id);
        let report = state.room.publish(&snapshot);

        tracing::debug!(
            session_id = %entry.id,
            field = %mutation.field(),
            revision = snapshot.revision,
            delivered = report.delivered,
            evicted = report.evicted,
            "Mutation applied"
        );
        Ok(snapshot)
    }

    async fn subscribe(&self, id: &SessionId) -> Result<ChannelHandle, SessionError> {
        let entry = self.entry(id)?;
        let (channel_id, events) = {
            let mut state = entry.state.lock();
            let current = state.snapshot(entry.id);
            state.room.attach(current)
        };

        tracing::debug!(session_id = %entry.id, channel_id = %channel_id, "Subscriber attached");
        let owner: Weak<dyn ChannelOwner> = Arc::downgrade(&entry) as Weak<dyn ChannelOwner>;
        Ok(ChannelHandle::new(channel_id, entry.id, events, owner))
    }

    async fn subscriber_count(&self, id: &SessionId) -> Result<usize, SessionError> {
        let entry = self.entry(id)?;
        let count = entry.state.lock().room.len();
        Ok(count)
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{
        DocumentField, MutationRequest, OperationKind, TandemEntry,
    };
    use crate::domain::foundation::{EntryId, Timestamp};
    use crate::ports::ChannelState;
    use serde_json::json;

    fn mutation(request: MutationRequest) -> FieldMutation {
        FieldMutation::from_request(request, Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn created_session_starts_empty_at_revision_zero() {
        let store = InMemorySessionStore::new(8);

        let created = store.create().await.unwrap();
        let fetched = store.get(&created.session_id).await.unwrap();

        assert_eq!(fetched.revision, 0);
        assert_eq!(*fetched.document, SharedDocument::default());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = InMemorySessionStore::new(8);
        let id = SessionId::new();

        assert!(matches!(store.get(&id).await, Err(SessionError::NotFound(_))));
        assert!(matches!(
            store.mutate(&id, &mutation(MutationRequest::increment_keys(1))).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            store.subscribe(&id).await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn applied_mutation_bumps_revision() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;

        let after = store
            .mutate(&id, &mutation(MutationRequest::append_wish("Beach night")))
            .await
            .unwrap();

        assert_eq!(after.revision, 1);
        assert_eq!(after.document.wishes[0].text, "Beach night");
    }

    #[tokio::test]
    async fn unchanged_mutation_keeps_revision_and_does_not_publish() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;
        let mut channel = store.subscribe(&id).await.unwrap();
        channel.recv().await.unwrap();

        let missing = EntryId::new("nope").unwrap();
        let after = store
            .mutate(
                &id,
                &mutation(MutationRequest::remove_entry(DocumentField::Wishes, &missing)),
            )
            .await
            .unwrap();

        assert_eq!(after.revision, 0);
        assert!(matches!(
            tokio::time::timeout(std::time::Duration::from_millis(20), channel.recv()).await,
            Err(_)
        ));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_document_untouched() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;
        store
            .mutate(
                &id,
                &mutation(MutationRequest::new(
                    DocumentField::Keys,
                    OperationKind::ReplaceField,
                    json!(i64::MAX),
                )),
            )
            .await
            .unwrap();

        let result = store
            .mutate(&id, &mutation(MutationRequest::increment_keys(1)))
            .await;

        assert!(matches!(result, Err(SessionError::InvalidMutation(_))));
        let current = store.get(&id).await.unwrap();
        assert_eq!(current.revision, 1);
        assert_eq!(current.document.keys, i64::MAX);
    }

    #[tokio::test]
    async fn subscriber_receives_current_then_every_change_in_order() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;
        store
            .mutate(&id, &mutation(MutationRequest::increment_keys(3)))
            .await
            .unwrap();

        let mut channel = store.subscribe(&id).await.unwrap();
        assert_eq!(channel.state(), ChannelState::Connecting);

        for delta in [1, 2, 3] {
            store
                .mutate(&id, &mutation(MutationRequest::increment_keys(delta)))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..4 {
            let snapshot = channel.recv().await.unwrap();
            seen.push((snapshot.revision, snapshot.document.keys));
        }
        assert_eq!(seen, vec![(1, 3), (2, 4), (3, 6), (4, 9)]);
        assert_eq!(channel.state(), ChannelState::Open);
    }

    #[tokio::test]
    async fn dropping_channel_unsubscribes() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;

        let channel = store.subscribe(&id).await.unwrap();
        assert_eq!(store.subscriber_count(&id).await.unwrap(), 1);

        drop(channel);
        assert_eq!(store.subscriber_count(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn slow_subscriber_is_evicted_and_others_keep_receiving() {
        let store = InMemorySessionStore::new(2);
        let id = store.create().await.unwrap().session_id;
        let mut stalled = store.subscribe(&id).await.unwrap();
        let mut live = store.subscribe(&id).await.unwrap();

        for _ in 0..4 {
            store
                .mutate(&id, &mutation(MutationRequest::increment_keys(1)))
                .await
                .unwrap();
            live.recv().await.unwrap();
        }

        assert_eq!(store.subscriber_count(&id).await.unwrap(), 1);
        assert_eq!(live.recv().await.unwrap().revision, 4);

        let mut drained = 0;
        while stalled.recv().await.is_some() {
            drained += 1;
        }
        assert_eq!(drained, 2);
        assert_eq!(stalled.state(), ChannelState::Closed);
    }

    #[tokio::test]
    async fn snapshots_are_isolated_from_later_mutations() {
        let store = InMemorySessionStore::new(8);
        let id = store.create().await.unwrap().session_id;
        let entry = TandemEntry {
            prompt: "Best trip?".to_string(),
            first: Some("Lisbon".to_string()),
            second: None,
        };
        let before = store
            .mutate(&id, &mutation(MutationRequest::replace_tandem_entry(Some(&entry))))
            .await
            .unwrap();

        store
            .mutate(&id, &mutation(MutationRequest::replace_tandem_entry(None)))
            .await
            .unwrap();

        assert_eq!(before.document.tandem_entry.as_ref(), Some(&entry));
        assert!(store.get(&id).await.unwrap().document.tandem_entry.is_none());
    }

    #[tokio::test]
    async fn concurrent_mutations_are_all_applied() {
        let store = Arc::new(InMemorySessionStore::new(8));
        let id = store.create().await.unwrap().session_id;

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .mutate(&id, &mutation(MutationRequest::increment_keys(1)))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let current = store.get(&id).await.unwrap();
        assert_eq!(current.revision, 50);
        assert_eq!(current.document.keys, 50);
    }
}
