//! WebSocket adapters for live session updates.
//!
//! This module pushes document snapshots to connected partner clients.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    InMemorySessionStore                              │
//! │   mutate → apply → revision += 1 → Room::publish (under one lock)   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ try_send per channel
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           Room                                       │
//! │   channel-a (bounded)   channel-b (bounded)   full → evicted        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ ChannelHandle::recv
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      subscribe_handler                               │
//! │   one writer loop per socket: snapshots, pongs, heartbeats          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Per-session subscriber sets and fan-out
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::subscribe_handler;
pub use messages::{
    ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage, CHANNEL_CLOSED,
};
pub use rooms::{PublishReport, Room};
