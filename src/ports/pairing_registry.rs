//! Pairing Registry Port - short-lived codes that resolve to a session.

use async_trait::async_trait;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::pairing::{PairingCode, PairingError};

/// A freshly issued code.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCode {
    pub code: PairingCode,
    pub session_id: SessionId,
    pub expires_at: Timestamp,
}

/// Port for issuing and redeeming pairing codes.
///
/// Codes are single use: a successful redeem removes the code. Expired
/// codes behave exactly like codes that never existed.
#[async_trait]
pub trait PairingRegistry: Send + Sync {
    /// Issues a new code for `session_id`, unique among live codes.
    ///
    /// # Errors
    ///
    /// - `CodeSpaceExhausted` if no unused code could be drawn
    async fn issue(&self, session_id: SessionId) -> Result<IssuedCode, PairingError>;

    /// Consumes a code and returns the session it points at.
    ///
    /// Input is normalised first (case, whitespace, dashes).
    ///
    /// # Errors
    ///
    /// - `CodeNotFound` for unknown, already redeemed, or expired codes
    async fn redeem(&self, code: &str) -> Result<SessionId, PairingError>;

    /// Drops expired codes. Returns how many were removed.
    async fn purge_expired(&self) -> usize;

    /// Number of codes currently held, expired or not.
    async fn len(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_registry_is_object_safe() {
        fn _accepts_dyn(_registry: &dyn PairingRegistry) {}
    }
}
