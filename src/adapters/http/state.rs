//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::{
    CreateSessionHandler, GetSessionHandler, IssueCodeHandler, MutateDocumentHandler,
    RedeemCodeHandler, SubscribeSessionHandler,
};
use crate::config::LiveConfig;
use crate::ports::{Clock, PairingRegistry, SessionStore};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub create_session: Arc<CreateSessionHandler>,
    pub get_session: Arc<GetSessionHandler>,
    pub mutate_document: Arc<MutateDocumentHandler>,
    pub subscribe_session: Arc<SubscribeSessionHandler>,
    pub issue_code: Arc<IssueCodeHandler>,
    pub redeem_code: Arc<RedeemCodeHandler>,
    pub store: Arc<dyn SessionStore>,
    pub live: LiveConfig,
}

impl AppState {
    /// Wire every handler against one store and registry.
    pub fn new(
        store: Arc<dyn SessionStore>,
        registry: Arc<dyn PairingRegistry>,
        clock: Arc<dyn Clock>,
        live: LiveConfig,
    ) -> Self {
        Self {
            create_session: Arc::new(CreateSessionHandler::new(store.clone(), registry.clone())),
            get_session: Arc::new(GetSessionHandler::new(store.clone())),
            mutate_document: Arc::new(MutateDocumentHandler::new(store.clone(), clock)),
            subscribe_session: Arc::new(SubscribeSessionHandler::new(store.clone())),
            issue_code: Arc::new(IssueCodeHandler::new(store.clone(), registry.clone())),
            redeem_code: Arc::new(RedeemCodeHandler::new(store.clone(), registry)),
            store,
            live,
        }
    }
}
