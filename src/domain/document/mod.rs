//! Shared document module.
//!
//! The document partners edit together, the typed field mutations that
//! change it, and the snapshot type that fans out to subscribers.

mod errors;
mod mutation;
mod records;
mod shared_document;
mod snapshot;

pub use errors::DocumentError;
pub use mutation::{
    FieldMutation, FieldValue, ListItem, MutationOutcome, MutationRequest, OperationKind,
};
pub use records::{
    BodyMark, BodyMarkDraft, DiceConfig, Stamp, StampDraft, TandemEntry, Wish, WishDraft,
};
pub use shared_document::{DocumentField, SharedDocument};
pub use snapshot::DocumentSnapshot;
