//! Pairing module - short-lived single-use codes that let a partner join.

mod code;
mod errors;

pub use code::{PairingCode, PairingEntry, CODE_ALPHABET};
pub use errors::PairingError;
