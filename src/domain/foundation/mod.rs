//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the lifecycle state machine trait and
//! the error vocabulary used by every other module.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{ChannelId, EntryId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
