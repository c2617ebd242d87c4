//! Live subscription configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Subscriber channel tuning
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LiveConfig {
    /// Snapshots buffered per subscriber before it is evicted
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Milliseconds one websocket write may take before the connection is dropped
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,

    /// Seconds between server pings
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
}

impl LiveConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::MustBePositive("live.channel_capacity"));
        }
        if self.send_timeout_ms == 0 {
            return Err(ValidationError::MustBePositive("live.send_timeout_ms"));
        }
        if self.ping_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("live.ping_interval_secs"));
        }
        Ok(())
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            send_timeout_ms: default_send_timeout(),
            ping_interval_secs: default_ping_interval(),
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}

fn default_send_timeout() -> u64 {
    5_000
}

fn default_ping_interval() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_config_defaults() {
        let config = LiveConfig::default();
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.send_timeout(), Duration::from_secs(5));
        assert_eq!(config.ping_interval(), Duration::from_secs(20));
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config = LiveConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
