//! Session Store Port - owns every live session's document and subscribers.
//!
//! Sessions live for the lifetime of the process. Each session has exactly
//! one document, a revision counter, and a set of subscriber channels that
//! receive a full snapshot after every change.

use async_trait::async_trait;

use super::subscriber_channel::ChannelHandle;
use crate::domain::document::{DocumentSnapshot, FieldMutation};
use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;

/// Port for the authoritative session state.
///
/// Implementations must guarantee:
/// - mutations to one session are applied one at a time
/// - every subscriber sees snapshots in the order mutations were applied
/// - a subscriber receives the current snapshot first, then every later one
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session with an empty document at revision 0.
    async fn create(&self) -> Result<DocumentSnapshot, SessionError>;

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such session exists
    async fn get(&self, id: &SessionId) -> Result<DocumentSnapshot, SessionError>;

    /// Applies one mutation and fans the resulting snapshot out.
    ///
    /// A mutation that leaves the document unchanged does not bump the
    /// revision and does not publish; the current snapshot is returned.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such session exists
    /// - `InvalidMutation` if the mutation could not be applied; the
    ///   document is left untouched
    async fn mutate(
        &self,
        id: &SessionId,
        mutation: &FieldMutation,
    ) -> Result<DocumentSnapshot, SessionError>;

    /// Registers a subscriber channel seeded with the current snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such session exists
    async fn subscribe(&self, id: &SessionId) -> Result<ChannelHandle, SessionError>;

    /// Number of channels currently attached to a session.
    async fn subscriber_count(&self, id: &SessionId) -> Result<usize, SessionError>;

    /// Number of live sessions.
    async fn session_count(&self) -> usize;
}
