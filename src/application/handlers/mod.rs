//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod pairing;
pub mod session;

pub use pairing::{
    IssueCodeCommand, IssueCodeHandler, PairingFlowError, RedeemCodeCommand, RedeemCodeHandler,
};
pub use session::{
    CreateSessionHandler, CreateSessionResult, GetSessionHandler, GetSessionQuery,
    MutateDocumentCommand, MutateDocumentHandler, SubscribeSessionCommand,
    SubscribeSessionHandler,
};
