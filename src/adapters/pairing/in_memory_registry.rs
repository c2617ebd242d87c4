//! In-memory pairing registry.
//!
//! Codes live in a map keyed by their canonical form. Expiry is checked
//! lazily on every redeem and issue; the sweeper task removes leftovers so
//! the map does not grow with codes nobody redeemed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::PairingConfig;
use crate::domain::foundation::SessionId;
use crate::domain::pairing::{PairingCode, PairingEntry, PairingError};
use crate::ports::{Clock, CodeGenerator, IssuedCode, PairingRegistry};

pub struct InMemoryPairingRegistry {
    codes: Mutex<HashMap<PairingCode, PairingEntry>>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    config: PairingConfig,
}

impl InMemoryPairingRegistry {
    pub fn new(
        config: PairingConfig,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            generator,
            clock,
            config,
        }
    }
}

#[async_trait]
impl PairingRegistry for InMemoryPairingRegistry {
    async fn issue(&self, session_id: SessionId) -> Result<IssuedCode, PairingError> {
        let now = self.clock.now();
        let ttl = self.config.code_ttl_secs;
        let mut codes = self.codes.lock();

        for attempt in 1..=self.config.max_issue_attempts {
            let code = self.generator.generate(self.config.code_length);
            if let Some(existing) = codes.get(&code) {
                if !existing.is_expired(&now, ttl) {
                    tracing::debug!(attempt, "Pairing code collided with a live code, redrawing");
                    continue;
                }
            }

            let entry = PairingEntry::new(code.clone(), session_id, now);
            let expires_at = entry.expires_at(ttl);
            codes.insert(code.clone(), entry);

            tracing::info!(session_id = %session_id, "Issued pairing code");
            return Ok(IssuedCode {
                code,
                session_id,
                expires_at,
            });
        }

        tracing::warn!(
            attempts = self.config.max_issue_attempts,
            live_codes = codes.len(),
            "Could not allocate an unused pairing code"
        );
        Err(PairingError::CodeSpaceExhausted {
            attempts: self.config.max_issue_attempts,
        })
    }

    async fn redeem(&self, code: &str) -> Result<SessionId, PairingError> {
        let code = PairingCode::parse(code).ok_or(PairingError::CodeNotFound)?;
        let now = self.clock.now();

        let entry = self
            .codes
            .lock()
            .remove(&code)
            .ok_or(PairingError::CodeNotFound)?;

        if entry.is_expired(&now, self.config.code_ttl_secs) {
            tracing::debug!(session_id = %entry.session_id, "Rejected expired pairing code");
            return Err(PairingError::CodeNotFound);
        }

        tracing::info!(session_id = %entry.session_id, "Pairing code redeemed");
        Ok(entry.session_id)
    }

    async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.config.code_ttl_secs;
        let mut codes = self.codes.lock();
        let before = codes.len();
        codes.retain(|_, entry| !entry.is_expired(&now, ttl));
        before - codes.len()
    }

    async fn len(&self) -> usize {
        self.codes.lock().len()
    }
}
