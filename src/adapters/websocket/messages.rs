//! WebSocket message types for live document updates.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: Connection status, document snapshots, errors, pongs
//! - Client → Server: Pings

use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentSnapshot;

// ============================================
// Server → Client Messages
// ============================================

/// Error code sent when the server drops a channel that fell behind.
pub const CHANNEL_CLOSED: &str = "CHANNEL_CLOSED";

/// All message types that can be sent from server to client.
///
/// Deserializable as well so the partner client can read the same stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Channel registered; snapshots follow.
    Connected(ConnectedMessage),

    /// Full document after a change (the first one is the current state).
    Document(DocumentSnapshot),

    /// Error occurred; the server closes the connection afterwards.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when the client's channel is attached to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub session_id: String,
    pub channel_id: String,
    pub timestamp: String,
}

/// Error message sent to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}
