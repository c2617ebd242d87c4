//! HTTP + WebSocket implementation of the SyncApi port.
//!
//! Requests go over `reqwest`; live snapshots arrive over a
//! `tokio-tungstenite` connection to `/api/sessions/:id/subscribe`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::adapters::http::session::{MutateResponse, PairingCodeResponse, SessionResponse};
use crate::adapters::http::ErrorResponse;
use crate::adapters::websocket::ServerMessage;
use crate::domain::document::{DocumentSnapshot, MutationRequest};
use crate::domain::foundation::{ErrorCode, SessionId, Timestamp};
use crate::ports::{PairingInvite, SnapshotStream, SyncApi, SyncApiError};

pub struct HttpSyncApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSyncApi {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn subscribe_url(&self, session_id: &SessionId) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        };
        format!("{}/api/sessions/{}/subscribe", ws_base, session_id)
    }
}

fn transport(err: impl std::fmt::Display) -> SyncApiError {
    SyncApiError::Transport(err.to_string())
}

/// Decodes a success body, or maps the server's error body to a port error.
///
/// `not_found` is what a bare 404 without a recognisable error body means
/// for this endpoint; `None` treats it as a transport failure.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    not_found: Option<SyncApiError>,
) -> Result<T, SyncApiError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(transport);
    }

    let body = response.json::<ErrorResponse>().await.ok();
    Err(error_from(status, body, not_found))
}

fn error_from(
    status: StatusCode,
    body: Option<ErrorResponse>,
    not_found: Option<SyncApiError>,
) -> SyncApiError {
    let code = body.as_ref().map(|b| b.code.as_str()).unwrap_or_default();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| status.to_string());

    if code == ErrorCode::CodeNotFound.to_string() {
        SyncApiError::CodeNotFound
    } else if code == ErrorCode::SessionNotFound.to_string() {
        SyncApiError::SessionNotFound
    } else if code == ErrorCode::InvalidMutation.to_string() {
        SyncApiError::InvalidMutation(message)
    } else {
        match not_found {
            Some(err) if status == StatusCode::NOT_FOUND => err,
            _ => SyncApiError::Transport(format!("{}: {}", status, message)),
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, SyncApiError> {
    raw.parse().map_err(transport)
}

impl TryFrom<PairingCodeResponse> for PairingInvite {
    type Error = SyncApiError;

    fn try_from(body: PairingCodeResponse) -> Result<Self, Self::Error> {
        let expires_at = DateTime::parse_from_rfc3339(&body.expires_at).map_err(transport)?;
        Ok(PairingInvite {
            session_id: parse_session_id(&body.session_id)?,
            pairing_code: body.pairing_code,
            expires_at: Timestamp::from_datetime(expires_at.with_timezone(&Utc)),
        })
    }
}

impl TryFrom<SessionResponse> for DocumentSnapshot {
    type Error = SyncApiError;

    fn try_from(body: SessionResponse) -> Result<Self, Self::Error> {
        Ok(DocumentSnapshot {
            session_id: parse_session_id(&body.session_id)?,
            revision: body.revision,
            document: body.document,
        })
    }
}

fn decode_frame(message: Message) -> Option<Result<DocumentSnapshot, SyncApiError>> {
    if !message.is_text() {
        return None;
    }
    let text = match message.to_text() {
        Ok(text) => text,
        Err(e) => return Some(Err(transport(e))),
    };
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Document(snapshot)) => Some(Ok(snapshot)),
        Ok(ServerMessage::Error(err)) => Some(Err(SyncApiError::Transport(format!(
            "{}: {}",
            err.code, err.message
        )))),
        Ok(ServerMessage::Connected(_)) | Ok(ServerMessage::Pong(_)) => None,
        Err(e) => Some(Err(transport(e))),
    }
}

#[async_trait]
impl SyncApi for HttpSyncApi {
    async fn create_session(&self) -> Result<PairingInvite, SyncApiError> {
        let response = self
            .http
            .post(self.url("/api/sessions"))
            .send()
            .await
            .map_err(transport)?;
        read_json::<PairingCodeResponse>(response, None).await?.try_into()
    }

    async fn issue_code(&self, session_id: &SessionId) -> Result<PairingInvite, SyncApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/sessions/{}/pairing-code", session_id)))
            .send()
            .await
            .map_err(transport)?;
        read_json::<PairingCodeResponse>(response, Some(SyncApiError::SessionNotFound))
            .await?
            .try_into()
    }

    async fn redeem_code(&self, code: &str) -> Result<DocumentSnapshot, SyncApiError> {
        let response = self
            .http
            .post(self.url("/api/pairing/redeem"))
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .map_err(transport)?;
        read_json::<SessionResponse>(response, Some(SyncApiError::CodeNotFound))
            .await?
            .try_into()
    }

    async fn get_session(&self, session_id: &SessionId) -> Result<DocumentSnapshot, SyncApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/sessions/{}", session_id)))
            .send()
            .await
            .map_err(transport)?;
        read_json::<SessionResponse>(response, Some(SyncApiError::SessionNotFound))
            .await?
            .try_into()
    }

    async fn mutate(
        &self,
        session_id: &SessionId,
        request: &MutationRequest,
    ) -> Result<u64, SyncApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/sessions/{}/mutate", session_id)))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let ack: MutateResponse =
            read_json(response, Some(SyncApiError::SessionNotFound)).await?;
        Ok(ack.revision)
    }

    async fn subscribe(&self, session_id: &SessionId) -> Result<SnapshotStream, SyncApiError> {
        let url = self.subscribe_url(session_id);
        let (socket, _) = match connect_async(url.as_str()).await {
            Ok(connected) => connected,
            Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 404 => {
                return Err(SyncApiError::SessionNotFound);
            }
            Err(e) => return Err(transport(e)),
        };

        tracing::debug!(session_id = %session_id, "Subscription connected");

        let stream = socket.filter_map(|frame| async move {
            match frame {
                Ok(message) => decode_frame(message),
                Err(e) => Some(Err(transport(e))),
            }
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_url_switches_scheme() {
        let session_id = SessionId::new();

        let plain = HttpSyncApi::new("http://localhost:8080/");
        assert_eq!(
            plain.subscribe_url(&session_id),
            format!("ws://localhost:8080/api/sessions/{}/subscribe", session_id)
        );

        let tls = HttpSyncApi::new("https://tandem.example.com");
        assert!(tls.subscribe_url(&session_id).starts_with("wss://tandem.example.com/"));
    }

    #[test]
    fn document_frames_decode_to_snapshots() {
        let snapshot = DocumentSnapshot::new(SessionId::new(), 3, Default::default());
        let text = serde_json::to_string(&ServerMessage::Document(snapshot.clone())).unwrap();

        let decoded = decode_frame(Message::text(text)).unwrap().unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn control_frames_are_skipped() {
        let pong = r#"{"type":"pong","timestamp":"2026-01-01T00:00:00Z"}"#;
        assert!(decode_frame(Message::text(pong)).is_none());
        assert!(decode_frame(Message::Ping(Vec::new().into())).is_none());
    }

    #[test]
    fn error_frames_surface_as_transport_errors() {
        let error = r#"{"type":"error","code":"CHANNEL_CLOSED","message":"fell behind","timestamp":"2026-01-01T00:00:00Z"}"#;
        assert!(matches!(
            decode_frame(Message::text(error)),
            Some(Err(SyncApiError::Transport(_)))
        ));
    }

    #[test]
    fn bare_404_maps_to_the_endpoint_resource() {
        let redeem = error_from(StatusCode::NOT_FOUND, None, Some(SyncApiError::CodeNotFound));
        assert_eq!(redeem, SyncApiError::CodeNotFound);

        let session = error_from(StatusCode::NOT_FOUND, None, Some(SyncApiError::SessionNotFound));
        assert_eq!(session, SyncApiError::SessionNotFound);

        let create = error_from(StatusCode::NOT_FOUND, None, None);
        assert!(matches!(create, SyncApiError::Transport(_)));
    }

    #[test]
    fn error_body_code_wins_over_status_fallback() {
        let body = ErrorResponse::new(ErrorCode::SessionNotFound, "Session not found");

        let err = error_from(StatusCode::NOT_FOUND, Some(body), Some(SyncApiError::CodeNotFound));

        assert_eq!(err, SyncApiError::SessionNotFound);
    }

    #[test]
    fn server_error_without_body_is_transport() {
        let err = error_from(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            Some(SyncApiError::SessionNotFound),
        );
        assert!(matches!(err, SyncApiError::Transport(_)));
    }
}
