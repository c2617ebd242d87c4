//! Client-side reconciler.
//!
//! Owns one partner's connection to a session: remembers which session it
//! is paired with, keeps a live subscription open, merges confirmed
//! snapshots with local edits that are still in flight, and publishes the
//! result as a [`ClientView`] on a `watch` channel.
//!
//! # Lifecycle
//!
//! ```text
//! start() ── stored id? ── no ──▶ unpaired
//!               │ yes
//!               ▼
//!        GET session ── 404 ──▶ forget id, unpaired
//!               │ ok / transport error
//!               ▼
//!        subscribe ◀──────────── backoff ◀── stream ended / failed
//!               │                               ▲
//!               └── snapshots ──▶ Live ─────────┘
//! ```
//!
//! Every pairing change bumps an epoch; a subscription task from an older
//! epoch can no longer touch the state, so `join` and `logout` never race
//! with snapshots from the previous session.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::domain::document::{DocumentSnapshot, FieldMutation, MutationRequest, SharedDocument};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{PairingInvite, SessionIdStorage, SyncApi, SyncApiError};

use super::backoff::Backoff;
use super::errors::ClientError;
use super::overlay::PendingEdits;
use super::view::{ClientView, ConnectionState};

#[derive(Default)]
struct State {
    epoch: u64,
    session_id: Option<SessionId>,
    connection: ConnectionState,
    confirmed: Option<DocumentSnapshot>,
    pending: PendingEdits,
    last_error: Option<ClientError>,
}

impl State {
    fn confirmed_revision(&self) -> u64 {
        self.confirmed.as_ref().map_or(0, |s| s.revision)
    }

    fn view(&self) -> ClientView {
        let document = match &self.confirmed {
            Some(snapshot) => self.pending.apply_to(&snapshot.document),
            None => self.pending.apply_to(&SharedDocument::default()),
        };
        ClientView {
            session_id: self.session_id,
            connection: self.connection,
            revision: self.confirmed_revision(),
            document,
            pending_edits: self.pending.len(),
            last_error: self.last_error.clone(),
        }
    }
}

struct Shared {
    api: Arc<dyn SyncApi>,
    storage: Arc<dyn SessionIdStorage>,
    backoff: Backoff,
    state: Mutex<State>,
    view: watch::Sender<ClientView>,
}

impl Shared {
    /// Applies `f` if `epoch` is still current, then republishes the view.
    /// Returns false for a stale epoch.
    fn update(&self, epoch: u64, f: impl FnOnce(&mut State)) -> bool {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return false;
        }
        f(&mut state);
        self.view.send_replace(state.view());
        true
    }

    fn apply_snapshot(&self, epoch: u64, snapshot: DocumentSnapshot) -> bool {
        self.update(epoch, |state| {
            if state.session_id != Some(snapshot.session_id) {
                return;
            }
            if snapshot.revision >= state.confirmed_revision() {
                state.pending.reconcile(snapshot.revision);
                state.confirmed = Some(snapshot);
            }
            state.connection = ConnectionState::Live;
            state.last_error = None;
        })
    }

    fn set_connection(&self, epoch: u64, connection: ConnectionState) -> bool {
        self.update(epoch, |state| state.connection = connection)
    }

    fn record_error(&self, epoch: u64, error: ClientError) -> bool {
        self.update(epoch, |state| state.last_error = Some(error))
    }

    /// Drops the pairing after the server reported the session gone.
    async fn forget_session(&self, epoch: u64) {
        if self.state.lock().epoch != epoch {
            return;
        }
        if let Err(e) = self.storage.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored session id");
        }
        self.update(epoch, |state| {
            tracing::info!(session_id = ?state.session_id, "Session no longer exists, unpairing");
            let next_epoch = state.epoch + 1;
            *state = State {
                epoch: next_epoch,
                last_error: Some(ClientError::SessionNotFound),
                ..State::default()
            };
        });
    }
}

/// Keeps a subscription alive until the epoch changes or retries run out.
async fn run_subscription(shared: Arc<Shared>, session_id: SessionId, epoch: u64) {
    let mut attempt: u32 = 0;

    loop {
        if !shared.set_connection(epoch, ConnectionState::Connecting) {
            return;
        }

        match shared.api.subscribe(&session_id).await {
            Ok(mut stream) => {
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(snapshot) => {
                            attempt = 0;
                            if !shared.apply_snapshot(epoch, snapshot) {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(session_id = %session_id, error = %e, "Subscription stream failed");
                            shared.record_error(epoch, e.into());
                            break;
                        }
                    }
                }
                tracing::info!(session_id = %session_id, "Subscription ended");
            }
            Err(SyncApiError::SessionNotFound) => {
                shared.forget_session(epoch).await;
                return;
            }
            Err(e) => {
                tracing::debug!(session_id = %session_id, attempt, error = %e, "Subscribe failed");
                shared.record_error(epoch, e.into());
            }
        }

        attempt += 1;
        if shared.backoff.is_exhausted(attempt) {
            let attempts = shared.backoff.max_attempts();
            tracing::warn!(session_id = %session_id, attempts, "Giving up on reconnecting");
            shared.update(epoch, |state| {
                state.connection = ConnectionState::Disconnected;
                state.last_error = Some(ClientError::ReconnectExhausted { attempts });
            });
            return;
        }

        if !shared.set_connection(epoch, ConnectionState::Disconnected) {
            return;
        }
        tokio::time::sleep(shared.backoff.delay(attempt)).await;
    }
}

/// One partner's synchronized view of a session.
pub struct Reconciler {
    shared: Arc<Shared>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl Reconciler {
    pub fn new(
        api: Arc<dyn SyncApi>,
        storage: Arc<dyn SessionIdStorage>,
        backoff: Backoff,
    ) -> Self {
        let (view, _) = watch::channel(ClientView::default());
        Self {
            shared: Arc::new(Shared {
                api,
                storage,
                backoff,
                state: Mutex::new(State::default()),
                view,
            }),
            subscription: Mutex::new(None),
        }
    }

    pub fn from_config(
        api: Arc<dyn SyncApi>,
        storage: Arc<dyn SessionIdStorage>,
        config: &ClientConfig,
    ) -> Self {
        let backoff = Backoff::new(
            config.initial_backoff(),
            config.max_backoff(),
            config.max_reconnect_attempts,
        );
        Self::new(api, storage, backoff)
    }

    /// Latest view.
    pub fn view(&self) -> ClientView {
        self.shared.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn watch(&self) -> watch::Receiver<ClientView> {
        self.shared.view.subscribe()
    }

    /// Resumes the stored pairing, if any.
    ///
    /// A stored session the server no longer knows is forgotten and the
    /// client comes up unpaired. Transport failures keep the pairing and
    /// leave reconnecting to the subscription loop.
    pub async fn start(&self) -> Result<(), ClientError> {
        let Some(session_id) = self.shared.storage.load().await? else {
            tracing::debug!("No stored session, starting unpaired");
            return Ok(());
        };

        match self.shared.api.get_session(&session_id).await {
            Ok(snapshot) => {
                self.attach(session_id, Some(snapshot));
                Ok(())
            }
            Err(SyncApiError::SessionNotFound) => {
                tracing::info!(session_id = %session_id, "Stored session is gone, unpairing");
                self.shared.storage.clear().await?;
                self.reset(Some(ClientError::SessionNotFound));
                Ok(())
            }
            Err(e) => {
                let epoch = self.attach(session_id, None);
                self.shared.record_error(epoch, e.into());
                Ok(())
            }
        }
    }

    /// Creates a session, pairs with it, and returns the invite to share.
    pub async fn create_session(&self) -> Result<PairingInvite, ClientError> {
        let invite = self.shared.api.create_session().await?;
        self.shared.storage.save(&invite.session_id).await?;
        self.attach(invite.session_id, None);
        Ok(invite)
    }

    /// Joins the session behind `code`.
    pub async fn join(&self, code: &str) -> Result<SessionId, ClientError> {
        let snapshot = match self.shared.api.redeem_code(code).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = ClientError::from(e);
                self.note_error(err.clone());
                return Err(err);
            }
        };
        let session_id = snapshot.session_id;
        self.shared.storage.save(&session_id).await?;
        self.attach(session_id, Some(snapshot));
        Ok(session_id)
    }

    /// Issues a fresh code for the current session.
    pub async fn request_pairing_code(&self) -> Result<PairingInvite, ClientError> {
        let session_id = self.shared.state.lock().session_id.ok_or(ClientError::NotPaired)?;
        Ok(self.shared.api.issue_code(&session_id).await?)
    }

    /// Submits one edit.
    ///
    /// The edit shows in the view immediately and stays there until a
    /// newer snapshot arrives. Returns the server revision.
    pub async fn mutate(&self, request: MutationRequest) -> Result<u64, ClientError> {
        let request = request.with_entry_id();
        let mutation = FieldMutation::from_request(request.clone(), Timestamp::now())
            .map_err(|e| ClientError::InvalidMutation(e.to_string()))?;

        let (session_id, epoch, token) = {
            let mut state = self.shared.state.lock();
            let session_id = state.session_id.ok_or(ClientError::NotPaired)?;
            if state.connection != ConnectionState::Live {
                return Err(ClientError::Disconnected);
            }
            let confirmed = state.confirmed_revision();
            let token = state.pending.push(mutation, confirmed);
            self.shared.view.send_replace(state.view());
            (session_id, state.epoch, token)
        };

        match self.shared.api.mutate(&session_id, &request).await {
            Ok(revision) => {
                self.shared.update(epoch, |state| {
                    let confirmed = state.confirmed_revision();
                    state.pending.ack(token, revision, confirmed);
                });
                Ok(revision)
            }
            Err(e) => {
                let err = ClientError::from(e);
                self.shared.update(epoch, |state| {
                    state.pending.discard(token);
                    state.last_error = Some(err.clone());
                });
                if err == ClientError::SessionNotFound {
                    self.abort_subscription();
                    self.shared.forget_session(epoch).await;
                }
                Err(err)
            }
        }
    }

    /// Forgets the pairing and closes the subscription.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.abort_subscription();
        self.shared.storage.clear().await?;
        self.reset(None);
        tracing::info!("Logged out of session");
        Ok(())
    }

    fn attach(&self, session_id: SessionId, snapshot: Option<DocumentSnapshot>) -> u64 {
        self.abort_subscription();

        let epoch = {
            let mut state = self.shared.state.lock();
            let epoch = state.epoch + 1;
            *state = State {
                epoch,
                session_id: Some(session_id),
                connection: ConnectionState::Connecting,
                confirmed: snapshot,
                ..State::default()
            };
            self.shared.view.send_replace(state.view());
            epoch
        };

        let handle = tokio::spawn(run_subscription(self.shared.clone(), session_id, epoch));
        *self.subscription.lock() = Some(handle);
        epoch
    }

    fn reset(&self, last_error: Option<ClientError>) {
        let mut state = self.shared.state.lock();
        let epoch = state.epoch + 1;
        *state = State {
            epoch,
            last_error,
            ..State::default()
        };
        self.shared.view.send_replace(state.view());
    }

    fn note_error(&self, error: ClientError) {
        let mut state = self.shared.state.lock();
        state.last_error = Some(error);
        self.shared.view.send_replace(state.view());
    }

    fn abort_subscription(&self) {
        if let Some(handle) = self.subscription.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        self.abort_subscription();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::adapters::client::LocalSyncApi;
    use crate::adapters::clock::SystemClock;
    use crate::adapters::http::AppState;
    use crate::adapters::pairing::{InMemoryPairingRegistry, RandomCodeGenerator};
    use crate::adapters::session::InMemorySessionStore;
    use crate::adapters::storage::InMemorySessionIdStorage;
    use crate::config::{LiveConfig, PairingConfig};
    use crate::domain::document::{DocumentField, OperationKind};
    use crate::domain::foundation::EntryId;
    use crate::ports::SnapshotStream;
    use serde_json::json;

    fn local_api() -> Arc<LocalSyncApi> {
        let registry = Arc::new(InMemoryPairingRegistry::new(
            PairingConfig::default(),
            Arc::new(RandomCodeGenerator),
            Arc::new(SystemClock),
        ));
        Arc::new(LocalSyncApi::new(AppState::new(
            Arc::new(InMemorySessionStore::new(16)),
            registry,
            Arc::new(SystemClock),
            LiveConfig::default(),
        )))
    }

    fn backoff() -> Backoff {
        Backoff::new(Duration::from_millis(10), Duration::from_millis(40), 2)
    }

    fn reconciler(api: Arc<dyn SyncApi>, storage: Arc<InMemorySessionIdStorage>) -> Reconciler {
        Reconciler::new(api, storage, backoff())
    }

    async fn wait_for(
        rx: &mut watch::Receiver<ClientView>,
        pred: impl Fn(&ClientView) -> bool,
    ) -> ClientView {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let view = rx.borrow_and_update();
                    if pred(&view) {
                        return view.clone();
                    }
                }
                rx.changed().await.expect("reconciler dropped");
            }
        })
        .await
        .expect("timed out waiting for view")
    }

    /// Fails every call with a transport error and counts subscribe attempts.
    #[derive(Default)]
    struct UnreachableApi {
        subscribes: AtomicU32,
    }

    #[async_trait]
    impl SyncApi for UnreachableApi {
        async fn create_session(&self) -> Result<PairingInvite, SyncApiError> {
            Err(SyncApiError::Transport("connection refused".into()))
        }

        async fn issue_code(&self, _: &SessionId) -> Result<PairingInvite, SyncApiError> {
            Err(SyncApiError::Transport("connection refused".into()))
        }

        async fn redeem_code(&self, _: &str) -> Result<DocumentSnapshot, SyncApiError> {
            Err(SyncApiError::Transport("connection refused".into()))
        }

        async fn get_session(&self, _: &SessionId) -> Result<DocumentSnapshot, SyncApiError> {
            Err(SyncApiError::Transport("connection refused".into()))
        }

        async fn mutate(&self, _: &SessionId, _: &MutationRequest) -> Result<u64, SyncApiError> {
            Err(SyncApiError::Transport("connection refused".into()))
        }

        async fn subscribe(&self, _: &SessionId) -> Result<SnapshotStream, SyncApiError> {
            self.subscribes.fetch_add(1, Ordering::SeqCst);
            Err(SyncApiError::Transport("connection refused".into()))
        }
    }

    /// Answers `mutate` only after a delay, so the published snapshot
    /// reaches the subscriber before the request returns.
    struct SlowAckApi {
        inner: Arc<LocalSyncApi>,
        ack_delay: Duration,
    }

    #[async_trait]
    impl SyncApi for SlowAckApi {
        async fn create_session(&self) -> Result<PairingInvite, SyncApiError> {
            self.inner.create_session().await
        }

        async fn issue_code(&self, id: &SessionId) -> Result<PairingInvite, SyncApiError> {
            self.inner.issue_code(id).await
        }

        async fn redeem_code(&self, code: &str) -> Result<DocumentSnapshot, SyncApiError> {
            self.inner.redeem_code(code).await
        }

        async fn get_session(&self, id: &SessionId) -> Result<DocumentSnapshot, SyncApiError> {
            self.inner.get_session(id).await
        }

        async fn mutate(&self, id: &SessionId, req: &MutationRequest) -> Result<u64, SyncApiError> {
            let revision = self.inner.mutate(id, req).await?;
            tokio::time::sleep(self.ack_delay).await;
            Ok(revision)
        }

        async fn subscribe(&self, id: &SessionId) -> Result<SnapshotStream, SyncApiError> {
            self.inner.subscribe(id).await
        }
    }

    #[tokio::test]
    async fn starts_unpaired_without_stored_session() {
        let client = reconciler(local_api(), Arc::new(InMemorySessionIdStorage::new()));

        client.start().await.unwrap();

        let view = client.view();
        assert!(!view.is_paired());
        assert_eq!(view.connection, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn partners_see_each_others_edits() {
        let api = local_api();
        let alice = reconciler(api.clone(), Arc::new(InMemorySessionIdStorage::new()));
        let bob = reconciler(api, Arc::new(InMemorySessionIdStorage::new()));
        let mut alice_rx = alice.watch();
        let mut bob_rx = bob.watch();

        let invite = alice.create_session().await.unwrap();
        bob.join(&invite.pairing_code).await.unwrap();
        wait_for(&mut alice_rx, ClientView::is_live).await;
        wait_for(&mut bob_rx, ClientView::is_live).await;

        let revision = bob
            .mutate(MutationRequest::append_wish("Beach night"))
            .await
            .unwrap();

        let seen = wait_for(&mut alice_rx, |v| v.revision >= revision).await;
        let own = wait_for(&mut bob_rx, |v| v.revision >= revision && v.pending_edits == 0).await;
        assert_eq!(seen.document.wishes.len(), 1);
        assert_eq!(seen.document.wishes[0].text, "Beach night");
        assert_eq!(seen.document.wishes, own.document.wishes);
    }

    #[tokio::test]
    async fn stale_stored_session_is_forgotten() {
        let storage = Arc::new(InMemorySessionIdStorage::with_session(SessionId::new()));
        let client = reconciler(local_api(), storage.clone());

        client.start().await.unwrap();

        let view = client.view();
        assert!(!view.is_paired());
        assert_eq!(view.last_error, Some(ClientError::SessionNotFound));
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_session_resumes_after_restart() {
        let api = local_api();
        let storage = Arc::new(InMemorySessionIdStorage::new());
        let first = reconciler(api.clone(), storage.clone());
        let session_id = first.create_session().await.unwrap().session_id;
        drop(first);

        let second = reconciler(api, storage);
        let mut rx = second.watch();
        second.start().await.unwrap();

        let view = wait_for(&mut rx, ClientView::is_live).await;
        assert_eq!(view.session_id, Some(session_id));
    }

    #[tokio::test]
    async fn unknown_code_is_reported() {
        let client = reconciler(local_api(), Arc::new(InMemorySessionIdStorage::new()));

        let result = client.join("ZZ99ZZ").await;

        assert_eq!(result, Err(ClientError::CodeNotFound));
        assert_eq!(client.view().last_error, Some(ClientError::CodeNotFound));
        assert!(!client.view().is_paired());
    }

    #[tokio::test]
    async fn mutate_requires_pairing() {
        let client = reconciler(local_api(), Arc::new(InMemorySessionIdStorage::new()));

        let result = client.mutate(MutationRequest::increment_keys(1)).await;

        assert_eq!(result, Err(ClientError::NotPaired));
    }

    #[tokio::test]
    async fn noop_edit_is_acknowledged_without_new_revision() {
        let client = reconciler(local_api(), Arc::new(InMemorySessionIdStorage::new()));
        let mut rx = client.watch();
        client.create_session().await.unwrap();
        wait_for(&mut rx, ClientView::is_live).await;

        let revision = client
            .mutate(MutationRequest::remove_entry(
                DocumentField::Wishes,
                &EntryId::generate(),
            ))
            .await
            .unwrap();

        assert_eq!(revision, 0);
        assert_eq!(client.view().pending_edits, 0);
    }

    #[tokio::test]
    async fn malformed_edit_is_rejected_before_sending() {
        let client = reconciler(local_api(), Arc::new(InMemorySessionIdStorage::new()));
        let mut rx = client.watch();
        client.create_session().await.unwrap();
        wait_for(&mut rx, ClientView::is_live).await;

        let result = client
            .mutate(MutationRequest::new(
                DocumentField::Keys,
                OperationKind::AppendToList,
                json!({"text": "nope"}),
            ))
            .await;

        assert!(matches!(result, Err(ClientError::InvalidMutation(_))));
        assert_eq!(client.view().pending_edits, 0);
        assert_eq!(client.view().revision, 0);
    }

    #[tokio::test]
    async fn logout_forgets_the_pairing() {
        let storage = Arc::new(InMemorySessionIdStorage::new());
        let client = reconciler(local_api(), storage.clone());
        client.create_session().await.unwrap();

        client.logout().await.unwrap();

        assert!(!client.view().is_paired());
        assert_eq!(storage.load().await.unwrap(), None);
        assert_eq!(
            client.request_pairing_code().await,
            Err(ClientError::NotPaired)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_reconnect_attempts() {
        let api = Arc::new(UnreachableApi::default());
        let storage = Arc::new(InMemorySessionIdStorage::with_session(SessionId::new()));
        let client = reconciler(api.clone(), storage.clone());
        let mut rx = client.watch();

        client.start().await.unwrap();

        let view = wait_for(&mut rx, |v| {
            matches!(v.last_error, Some(ClientError::ReconnectExhausted { .. }))
        })
        .await;
        assert_eq!(view.connection, ConnectionState::Disconnected);
        assert_eq!(
            view.last_error,
            Some(ClientError::ReconnectExhausted { attempts: 2 })
        );
        assert_eq!(api.subscribes.load(Ordering::SeqCst), 3);
        // Transport failures never drop the pairing.
        assert!(view.is_paired());
        assert!(storage.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn snapshot_before_ack_is_not_double_counted() {
        let api = Arc::new(SlowAckApi {
            inner: local_api(),
            ack_delay: Duration::from_millis(200),
        });
        let client = reconciler(api, Arc::new(InMemorySessionIdStorage::new()));
        let mut rx = client.watch();
        client.create_session().await.unwrap();
        wait_for(&mut rx, ClientView::is_live).await;

        let (acked, mid_flight) = tokio::join!(
            client.mutate(MutationRequest::increment_keys(1)),
            wait_for(&mut rx, |v| v.revision >= 1),
        );

        assert_eq!(acked, Ok(1));
        assert_eq!(mid_flight.document.keys, 1);
        assert_eq!(mid_flight.pending_edits, 0);
        assert_eq!(client.view().document.keys, 1);
    }
}
