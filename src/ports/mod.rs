//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Server Ports
//!
//! - `SessionStore` - Authoritative documents, revisions and subscribers
//! - `PairingRegistry` - Short-lived codes that resolve to a session
//! - `CodeGenerator` - Source of candidate pairing codes
//! - `Clock` - Wall-clock time
//!
//! ## Client Ports
//!
//! - `SyncApi` - Transport to the sync server
//! - `SessionIdStorage` - Persistence of the paired session id

mod clock;
mod code_generator;
mod pairing_registry;
mod session_id_storage;
mod session_store;
mod subscriber_channel;
mod sync_api;

pub use clock::Clock;
pub use code_generator::CodeGenerator;
pub use pairing_registry::{IssuedCode, PairingRegistry};
pub use session_id_storage::{SessionIdStorage, SessionIdStorageError};
pub use session_store::SessionStore;
pub use subscriber_channel::{ChannelHandle, ChannelOwner, ChannelState};
pub use sync_api::{PairingInvite, SnapshotStream, SyncApi, SyncApiError};
