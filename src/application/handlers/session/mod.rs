//! Session command and query handlers.

mod create_session;
mod get_session;
mod mutate_document;
mod subscribe_session;

pub use create_session::{CreateSessionHandler, CreateSessionResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use mutate_document::{MutateDocumentCommand, MutateDocumentHandler};
pub use subscribe_session::{SubscribeSessionCommand, SubscribeSessionHandler};
