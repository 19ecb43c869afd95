//! Session client seam.
//!
//! The WhatsApp protocol, pairing, and transport are delegated to an external
//! client library and hidden behind the [`SessionClient`] trait. This crate
//! holds the trait and its payload types, recipient normalization, lifecycle
//! events, and two implementations: a stub (default builds) and the live bot
//! behind the `whatsapp-web` feature.

pub mod chat;
pub mod client;
pub mod events;
pub mod stub;
#[cfg(feature = "whatsapp-web")]
pub mod web;

pub use {
    chat::{ChatId, ChatIdError},
    client::{
        MediaKind, OutboundMedia, SessionClient, SessionError, SessionIdentity, SessionStatus,
    },
    events::SessionEvent,
};

use std::sync::Arc;

use tokio::sync::mpsc;

/// Build the session client for this process and return it together with its
/// lifecycle event stream (QR codes, readiness changes).
///
/// With the `whatsapp-web` feature the live bot is started in the background;
/// without it a stub is returned that never becomes ready, so the HTTP
/// surface stays up and send endpoints answer 503.
#[cfg(feature = "whatsapp-web")]
pub async fn connect(
    section: &wagate_config::schema::SessionSection,
) -> anyhow::Result<(Arc<dyn SessionClient>, mpsc::Receiver<SessionEvent>)> {
    let (client, events) = web::WebSessionClient::connect(section).await?;
    Ok((Arc::new(client), events))
}

#[cfg(not(feature = "whatsapp-web"))]
pub async fn connect(
    _section: &wagate_config::schema::SessionSection,
) -> anyhow::Result<(Arc<dyn SessionClient>, mpsc::Receiver<SessionEvent>)> {
    tracing::warn!(
        "built without the whatsapp-web feature; the session never becomes ready \
         and send endpoints answer 503"
    );
    let (_tx, rx) = mpsc::channel(1);
    Ok((Arc::new(stub::StubSessionClient), rx))
}
