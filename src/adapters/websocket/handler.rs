//! WebSocket upgrade handler for live session subscriptions.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Validate the session exists (404 before any upgrade)
//! 2. Open a subscriber channel seeded with the current snapshot
//! 3. Upgrade to WebSocket
//! 4. Forward snapshots, answer pings, send heartbeats until disconnect
//! 5. Drop the channel, which detaches it from the session

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::time::{timeout, MissedTickBehavior};

use crate::adapters::http::error::{handle_session_error, parse_session_id, ErrorResponse};
use crate::adapters::http::state::AppState;
use crate::application::handlers::SubscribeSessionCommand;
use crate::config::LiveConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::ChannelHandle;

use super::messages::{
    ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage, CHANNEL_CLOSED,
};

/// Handle WebSocket upgrade requests for a session.
///
/// Route: `GET /api/sessions/:id/subscribe`
///
/// Unknown or unparseable session ids are answered with a plain 404 so the
/// client can tell a dead session from a network problem. A request for a
/// live session without upgrade headers gets 426.
pub async fn subscribe_handler(
    ws: Option<WebSocketUpgrade>,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(e) => return handle_session_error(e),
    };

    let channel = match state
        .subscribe_session
        .handle(SubscribeSessionCommand { session_id })
        .await
    {
        Ok(channel) => channel,
        Err(e) => return handle_session_error(e),
    };

    let Some(ws) = ws else {
        return (
            StatusCode::UPGRADE_REQUIRED,
            Json(ErrorResponse::bad_request(
                "This endpoint only accepts WebSocket connections",
            )),
        )
            .into_response();
    };

    let live = state.live.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, channel, live))
}

/// Handle an established WebSocket connection.
///
/// One loop owns the write half, so snapshots, pongs and heartbeats go out
/// in a single order. Every write is bounded by `send_timeout`; a client
/// that stops reading is disconnected rather than buffered for.
async fn handle_socket(socket: WebSocket, mut channel: ChannelHandle, live: LiveConfig) {
    let (mut sender, mut receiver) = socket.split();
    let session_id = channel.session_id();
    let channel_id = channel.id();
    let send_timeout = live.send_timeout();

    let connected = ServerMessage::Connected(ConnectedMessage {
        session_id: session_id.to_string(),
        channel_id: channel_id.to_string(),
        timestamp: Timestamp::now().to_rfc3339(),
    });
    if let Err(e) = send_message(&mut sender, &connected, send_timeout).await {
        tracing::debug!(channel_id = %channel_id, "Failed to send connected message: {}", e);
        return;
    }

    let mut heartbeat = tokio::time::interval(live.ping_interval());
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    heartbeat.tick().await;

    loop {
        tokio::select! {
            snapshot = channel.recv() => {
                let Some(snapshot) = snapshot else {
                    tracing::info!(
                        session_id = %session_id,
                        channel_id = %channel_id,
                        "Channel closed by server, disconnecting"
                    );
                    let notice = ServerMessage::Error(ErrorMessage {
                        code: CHANNEL_CLOSED.to_string(),
                        message: "Subscriber fell behind; reconnect for a fresh snapshot".to_string(),
                        timestamp: Timestamp::now().to_rfc3339(),
                    });
                    let _ = send_message(&mut sender, &notice, send_timeout).await;
                    break;
                };
                let revision = snapshot.revision;
                if let Err(e) = send_message(&mut sender, &ServerMessage::Document(snapshot), send_timeout).await {
                    tracing::warn!(
                        channel_id = %channel_id,
                        revision,
                        "Snapshot delivery failed, closing connection: {}",
                        e
                    );
                    break;
                }
            }
            _ = heartbeat.tick() => {
                if let Err(e) = send_frame(&mut sender, Message::Ping(Vec::new()), send_timeout).await {
                    tracing::debug!(channel_id = %channel_id, "Heartbeat failed: {}", e);
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Ping) => {
                                let pong = ServerMessage::Pong(PongMessage {
                                    timestamp: Timestamp::now().to_rfc3339(),
                                });
                                if let Err(e) = send_message(&mut sender, &pong, send_timeout).await {
                                    tracing::debug!(channel_id = %channel_id, "Pong failed: {}", e);
                                    break;
                                }
                            }
                            Err(_) => {
                                tracing::debug!(channel_id = %channel_id, "Ignoring unrecognised client message");
                            }
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(channel_id = %channel_id, "Received unsupported binary message");
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        // Protocol-level frames are handled by axum
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(channel_id = %channel_id, "Client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(channel_id = %channel_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    channel.close();
    let _ = timeout(send_timeout, sender.close()).await;
    tracing::info!(session_id = %session_id, channel_id = %channel_id, "Subscriber channel closed");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
    send_timeout: Duration,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    send_frame(sender, Message::Text(json), send_timeout).await
}

async fn send_frame(
    sender: &mut SplitSink<WebSocket, Message>,
    frame: Message,
    send_timeout: Duration,
) -> Result<(), axum::Error> {
    match timeout(send_timeout, sender.send(frame)).await {
        Ok(result) => result,
        Err(elapsed) => Err(axum::Error::new(elapsed)),
    }
}
