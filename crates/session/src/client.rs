//! The session client trait and its payload types.

use {async_trait::async_trait, thiserror::Error};

use crate::chat::ChatId;

/// Kind of media payload, used by the client to pick the message shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
        }
    }
}

/// An outbound media payload, decoded and ready for delivery.
#[derive(Debug, Clone)]
pub struct OutboundMedia {
    pub kind: MediaKind,
    pub mime: String,
    pub data: Vec<u8>,
    pub filename: String,
    pub caption: Option<String>,
}

/// Identity of the paired account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Own phone number.
    pub number: String,
    /// Display ("push") name.
    pub display_name: String,
}

/// Point-in-time session readiness, read by the gateway before every send.
#[derive(Debug, Clone, Default)]
pub struct SessionStatus {
    pub ready: bool,
    pub identity: Option<SessionIdentity>,
}

/// Errors surfaced by a session client.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is not paired and connected yet.
    #[error("session is not ready, pair the device and wait for it to connect")]
    NotReady,

    /// The underlying client accepted the payload but failed to deliver.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Operations the gateway needs from the messaging session.
///
/// Protocol, pairing, and transport live entirely behind this trait; the
/// gateway only reads status and hands over normalized outbound payloads.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Current readiness and identity.
    async fn status(&self) -> SessionStatus;

    /// Deliver a plain text message.
    async fn send_text(&self, to: &ChatId, text: &str) -> Result<(), SessionError>;

    /// Deliver a media payload.
    async fn send_media(&self, to: &ChatId, media: OutboundMedia) -> Result<(), SessionError>;
}
