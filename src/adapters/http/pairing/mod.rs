//! HTTP adapter for pairing endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::RedeemCodeRequest;
pub use routes::pairing_routes;
