//! Stub session client for builds without the live integration.

use async_trait::async_trait;

use crate::{
    chat::ChatId,
    client::{OutboundMedia, SessionClient, SessionError, SessionStatus},
};

/// Always-unready client. Keeps the HTTP surface functional in builds
/// without the `whatsapp-web` feature: status reports unready and every
/// send endpoint answers 503.
pub struct StubSessionClient;

#[async_trait]
impl SessionClient for StubSessionClient {
    async fn status(&self) -> SessionStatus {
        SessionStatus::default()
    }

    async fn send_text(&self, _to: &ChatId, _text: &str) -> Result<(), SessionError> {
        Err(SessionError::NotReady)
    }

    async fn send_media(&self, _to: &ChatId, _media: OutboundMedia) -> Result<(), SessionError> {
        Err(SessionError::NotReady)
    }
}
