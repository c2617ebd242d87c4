//! CodeGenerator port - source of pairing codes.

use crate::domain::pairing::PairingCode;

/// Produces candidate pairing codes.
///
/// Production implementations must be unpredictable; the registry handles
/// collisions with live codes by asking again.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> PairingCode;
}
