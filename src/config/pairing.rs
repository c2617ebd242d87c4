//! Pairing code configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Pairing code issuance and expiry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PairingConfig {
    /// Seconds a code stays redeemable
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,

    /// Characters per code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds between expired-code sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Draws attempted before giving up on finding an unused code
    #[serde(default = "default_max_issue_attempts")]
    pub max_issue_attempts: u32,
}

impl PairingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(4..=12).contains(&self.code_length) {
            return Err(ValidationError::InvalidCodeLength);
        }
        if self.code_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("pairing.code_ttl_secs"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("pairing.sweep_interval_secs"));
        }
        if self.max_issue_attempts == 0 {
            return Err(ValidationError::MustBePositive("pairing.max_issue_attempts"));
        }
        Ok(())
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl(),
            code_length: default_code_length(),
            sweep_interval_secs: default_sweep_interval(),
            max_issue_attempts: default_max_issue_attempts(),
        }
    }
}

fn default_code_ttl() -> u64 {
    300
}

fn default_code_length() -> usize {
    6
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_max_issue_attempts() -> u32 {
    16
}
