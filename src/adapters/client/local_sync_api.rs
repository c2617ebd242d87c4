//! In-process implementation of the SyncApi port.
//!
//! Drives the application handlers directly, without HTTP. Useful for
//! embedding a server and a client in one process and for exercising the
//! reconciler against real session semantics.

use async_trait::async_trait;
use futures::StreamExt;

use crate::adapters::http::AppState;
use crate::application::handlers::{
    GetSessionQuery, IssueCodeCommand, MutateDocumentCommand, PairingFlowError,
    RedeemCodeCommand, SubscribeSessionCommand,
};
use crate::domain::document::{DocumentSnapshot, MutationRequest};
use crate::domain::foundation::SessionId;
use crate::domain::pairing::PairingError;
use crate::domain::session::SessionError;
use crate::ports::{IssuedCode, PairingInvite, SnapshotStream, SyncApi, SyncApiError};

pub struct LocalSyncApi {
    state: AppState,
}

impl LocalSyncApi {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl From<IssuedCode> for PairingInvite {
    fn from(issued: IssuedCode) -> Self {
        PairingInvite {
            session_id: issued.session_id,
            pairing_code: issued.code.to_string(),
            expires_at: issued.expires_at,
        }
    }
}

impl From<SessionError> for SyncApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => SyncApiError::SessionNotFound,
            SessionError::InvalidMutation(e) => SyncApiError::InvalidMutation(e.to_string()),
            SessionError::Infrastructure(msg) => SyncApiError::Transport(msg),
        }
    }
}

impl From<PairingFlowError> for SyncApiError {
    fn from(err: PairingFlowError) -> Self {
        match err {
            PairingFlowError::Pairing(PairingError::CodeNotFound) => SyncApiError::CodeNotFound,
            PairingFlowError::Pairing(other) => SyncApiError::Transport(other.to_string()),
            PairingFlowError::Session(session) => session.into(),
        }
    }
}

#[async_trait]
impl SyncApi for LocalSyncApi {
    async fn create_session(&self) -> Result<PairingInvite, SyncApiError> {
        let created = self.state.create_session.handle().await?;
        Ok(created.pairing.into())
    }

    async fn issue_code(&self, session_id: &SessionId) -> Result<PairingInvite, SyncApiError> {
        let issued = self
            .state
            .issue_code
            .handle(IssueCodeCommand {
                session_id: *session_id,
            })
            .await?;
        Ok(issued.into())
    }

    async fn redeem_code(&self, code: &str) -> Result<DocumentSnapshot, SyncApiError> {
        Ok(self
            .state
            .redeem_code
            .handle(RedeemCodeCommand {
                code: code.to_string(),
            })
            .await?)
    }

    async fn get_session(&self, session_id: &SessionId) -> Result<DocumentSnapshot, SyncApiError> {
        Ok(self
            .state
            .get_session
            .handle(GetSessionQuery {
                session_id: *session_id,
            })
            .await?)
    }

    async fn mutate(
        &self,
        session_id: &SessionId,
        request: &MutationRequest,
    ) -> Result<u64, SyncApiError> {
        let snapshot = self
            .state
            .mutate_document
            .handle(MutateDocumentCommand {
                session_id: *session_id,
                request: request.clone(),
            })
            .await?;
        Ok(snapshot.revision)
    }

    async fn subscribe(&self, session_id: &SessionId) -> Result<SnapshotStream, SyncApiError> {
        let channel = self
            .state
            .subscribe_session
            .handle(SubscribeSessionCommand {
                session_id: *session_id,
            })
            .await?;

        let stream = futures::stream::unfold(channel, |mut channel| async move {
            channel.recv().await.map(|snapshot| (Ok(snapshot), channel))
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::clock::SystemClock;
    use crate::adapters::pairing::{InMemoryPairingRegistry, RandomCodeGenerator};
    use crate::adapters::session::InMemorySessionStore;
    use crate::config::{LiveConfig, PairingConfig};

    fn api() -> LocalSyncApi {
        let registry = Arc::new(InMemoryPairingRegistry::new(
            PairingConfig::default(),
            Arc::new(RandomCodeGenerator),
            Arc::new(SystemClock),
        ));
        LocalSyncApi::new(AppState::new(
            Arc::new(InMemorySessionStore::new(8)),
            registry,
            Arc::new(SystemClock),
            LiveConfig::default(),
        ))
    }

    #[tokio::test]
    async fn invite_code_joins_the_same_session() {
        let api = api();
        let invite = api.create_session().await.unwrap();

        let snapshot = api.redeem_code(&invite.pairing_code).await.unwrap();

        assert_eq!(snapshot.session_id, invite.session_id);
        assert_eq!(
            api.redeem_code(&invite.pairing_code).await,
            Err(SyncApiError::CodeNotFound)
        );
    }

    #[tokio::test]
    async fn subscription_streams_mutations() {
        let api = api();
        let session_id = api.create_session().await.unwrap().session_id;
        let mut stream = api.subscribe(&session_id).await.unwrap();

        api.mutate(&session_id, &MutationRequest::increment_keys(2))
            .await
            .unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().revision, 0);
        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.revision, 1);
        assert_eq!(next.document.keys, 2);
    }

    #[tokio::test]
    async fn unknown_session_maps_to_session_not_found() {
        let api = api();

        assert!(matches!(
            api.subscribe(&SessionId::new()).await,
            Err(SyncApiError::SessionNotFound)
        ));
        assert_eq!(
            api.issue_code(&SessionId::new()).await,
            Err(SyncApiError::SessionNotFound)
        );
    }
}
