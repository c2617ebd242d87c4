//! Pairing code value object and registry entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp};

/// Characters a pairing code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A short, human-typable, single-use token resolving to a session.
///
/// Stored in canonical form: upper-case ASCII letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingCode(String);

impl PairingCode {
    /// Normalizes what a person typed: separators and whitespace are
    /// dropped and letters upper-cased. Returns `None` if nothing usable
    /// remains or a character outside the alphabet was entered.
    pub fn parse(input: &str) -> Option<Self> {
        let mut code = String::with_capacity(input.len());
        for c in input.chars() {
            if c.is_whitespace() || c == '-' {
                continue;
            }
            if !c.is_ascii_alphanumeric() {
                return None;
            }
            code.push(c.to_ascii_uppercase());
        }
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Builds a code from bytes drawn out of [`CODE_ALPHABET`].
    pub fn from_alphabet_bytes(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self(
            bytes
                .into_iter()
                .map(|b| char::from(b).to_ascii_uppercase())
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live code in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingEntry {
    pub code: PairingCode,
    pub session_id: SessionId,
    pub issued_at: Timestamp,
}

impl PairingEntry {
    pub fn new(code: PairingCode, session_id: SessionId, issued_at: Timestamp) -> Self {
        Self {
            code,
            session_id,
            issued_at,
        }
    }

    /// When this code stops being redeemable.
    pub fn expires_at(&self, ttl_secs: u64) -> Timestamp {
        self.issued_at.plus_secs(ttl_secs)
    }

    /// A code is expired from the instant `issued_at + ttl` is reached.
    pub fn is_expired(&self, now: &Timestamp, ttl_secs: u64) -> bool {
        !now.is_before(&self.expires_at(ttl_secs))
    }
}
