//! Domain layer containing the synchronization rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `document` - The shared document, field mutations and snapshots
//! - `pairing` - Pairing codes and their expiry rules
//! - `session` - Session store errors

pub mod document;
pub mod foundation;
pub mod pairing;
pub mod session;
