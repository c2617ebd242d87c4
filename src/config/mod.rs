//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TANDEM_SYNC` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable server.
//!
//! # Example
//!
//! ```no_run
//! use tandem_sync::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod client;
mod error;
mod live;
mod pairing;
mod server;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use live::LiveConfig;
pub use pairing::PairingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pairing: PairingConfig,
    pub live: LiveConfig,
    pub client: ClientConfig,
}

impl AppConfig {
    /// Reads `.env` if present, then every `TANDEM_SYNC__SECTION__KEY`
    /// variable. Missing keys keep their defaults.
    ///
    /// `TANDEM_SYNC__PAIRING__CODE_TTL_SECS=60` sets `pairing.code_ttl_secs`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TANDEM_SYNC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates every section, stopping at the first bad value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.pairing.validate()?;
        self.live.validate()?;
        self.client.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
