//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `session` - In-memory session store with subscriber fan-out
//! - `pairing` - Pairing code registry, generators and the expiry sweeper
//! - `clock` - System and manual clocks
//! - `http` - REST API (axum)
//! - `websocket` - Live subscription endpoint
//! - `client` - SyncApi over HTTP and WebSocket, or in-process
//! - `storage` - Persistence of the client's session id

pub mod client;
pub mod clock;
pub mod http;
pub mod pairing;
pub mod session;
pub mod storage;
pub mod websocket;
