//! Partner client.
//!
//! The [`Reconciler`] is what a screen talks to: it pairs, subscribes,
//! reconnects, and overlays in-flight edits on the last confirmed snapshot.
//! It reaches the server only through the `SyncApi` port and remembers its
//! pairing through the `SessionIdStorage` port.

mod backoff;
mod errors;
mod overlay;
mod reconciler;
mod view;

pub use backoff::Backoff;
pub use errors::ClientError;
pub use overlay::{EditToken, PendingEdits};
pub use reconciler::Reconciler;
pub use view::{ClientView, ConnectionState};
