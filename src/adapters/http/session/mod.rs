//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{MutateResponse, PairingCodeResponse, SessionResponse};
pub use routes::session_routes;
