//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own HTTP adapter for endpoint exposure; all of
//! them share one [`AppState`].

pub mod error;
pub mod health;
pub mod pairing;
pub mod router;
pub mod session;
pub mod state;

pub use error::ErrorResponse;
pub use router::api_router;
pub use state::AppState;
