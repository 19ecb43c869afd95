//! Live session client over the `whatsapp-rust` bot.
//!
//! Owns the bot lifecycle: sqlite device store, tokio WebSocket transport,
//! translation of bot events into [`SessionEvent`]s, and a watch channel
//! carrying the readiness flag the gateway reads before every send.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tokio::sync::{Mutex, mpsc, watch},
    tracing::{debug, info},
};

use {
    wacore::types::events::Event,
    wacore_binary::jid::Jid,
    whatsapp_rust::{bot::Bot, client::Client, store::SqliteStore},
    whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory,
    whatsapp_rust_ureq_http_client::UreqHttpClient,
};

use wagate_config::schema::SessionSection;

use crate::{
    chat::ChatId,
    client::{MediaKind, OutboundMedia, SessionClient, SessionError, SessionStatus},
    events::SessionEvent,
};

/// Live WhatsApp session. Holds the bot's client handle while connected and
/// a watch channel with the current status.
pub struct WebSessionClient {
    client: Arc<Mutex<Option<Arc<Client>>>>,
    status_rx: watch::Receiver<SessionStatus>,
}

impl WebSessionClient {
    /// Build the bot, start it in the background, and return the client
    /// together with the lifecycle event stream for terminal narration.
    pub async fn connect(
        section: &SessionSection,
    ) -> anyhow::Result<(Self, mpsc::Receiver<SessionEvent>)> {
        let store_path = section.store_path.clone().unwrap_or_else(|| {
            wagate_config::data_dir()
                .join("session.db")
                .to_string_lossy()
                .into_owned()
        });
        if let Some(parent) = std::path::Path::new(&store_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let device_name = section
            .device_name
            .clone()
            .unwrap_or_else(|| "wagate".into());

        info!(store = %store_path, "starting session client");

        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(16);
        let (status_tx, status_rx) = watch::channel(SessionStatus::default());

        let backend = Arc::new(
            SqliteStore::new(&store_path)
                .await
                .map_err(|e| anyhow::anyhow!("session store init failed: {e}"))?,
        );
        let client_slot: Arc<Mutex<Option<Arc<Client>>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&client_slot);
        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_device_props(
                Some(device_name),
                None,
                Some(waproto::whatsapp::device_props::PlatformType::Desktop),
            )
            .on_event(move |event, client| {
                let slot = Arc::clone(&slot);
                let events = event_tx.clone();
                let status = status_tx.clone();
                async move {
                    match event {
                        Event::PairingQrCode { code, .. } => {
                            let _ = events.send(SessionEvent::QrCode(code)).await;
                        },
                        Event::PairSuccess(_) => {
                            let _ = events.send(SessionEvent::Authenticated).await;
                        },
                        Event::Connected(_) => {
                            *slot.lock().await = Some(client);
                            // TODO: surface own number + push name from the
                            // device store once whatsapp-rust exposes them on
                            // the Connected payload.
                            status.send_replace(SessionStatus {
                                ready: true,
                                identity: None,
                            });
                            let _ = events.send(SessionEvent::Ready).await;
                        },
                        Event::Disconnected(_) => {
                            *slot.lock().await = None;
                            status.send_replace(SessionStatus::default());
                            let _ = events.send(SessionEvent::Disconnected).await;
                        },
                        Event::LoggedOut(_) => {
                            *slot.lock().await = None;
                            status.send_replace(SessionStatus::default());
                            let _ = events
                                .send(SessionEvent::AuthFailure("logged out from phone".into()))
                                .await;
                        },
                        _ => {},
                    }
                }
            })
            .build()
            .await
            .map_err(|e| anyhow::anyhow!("session bot build failed: {e}"))?;

        // A still-valid stored session connects without re-pairing; keep the
        // handle around from the start.
        *client_slot.lock().await = Some(bot.client());

        bot.run()
            .await
            .map_err(|e| anyhow::anyhow!("session bot run failed: {e}"))?;

        Ok((
            Self {
                client: client_slot,
                status_rx,
            },
            event_rx,
        ))
    }

    async fn connected_client(&self) -> Result<Arc<Client>, SessionError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or(SessionError::NotReady)
    }

    fn parse_jid(to: &ChatId) -> Result<Jid, SessionError> {
        to.as_str()
            .parse::<Jid>()
            .map_err(|e| SessionError::Delivery(format!("invalid chat id {to}: {e}")))
    }
}

#[async_trait]
impl SessionClient for WebSessionClient {
    async fn status(&self) -> SessionStatus {
        self.status_rx.borrow().clone()
    }

    async fn send_text(&self, to: &ChatId, text: &str) -> Result<(), SessionError> {
        let client = self.connected_client().await?;
        let jid = Self::parse_jid(to)?;

        let msg = waproto::whatsapp::Message {
            conversation: Some(text.to_string()),
            ..Default::default()
        };
        let msg_id = client
            .send_message(jid, msg)
            .await
            .map_err(|e| SessionError::Delivery(e.to_string()))?;

        debug!(%to, %msg_id, "text message delivered");
        Ok(())
    }

    async fn send_media(&self, to: &ChatId, media: OutboundMedia) -> Result<(), SessionError> {
        let client = self.connected_client().await?;
        let jid = Self::parse_jid(to)?;

        let media_type = match media.kind {
            MediaKind::Image => whatsapp_rust::download::MediaType::Image,
            MediaKind::Video => whatsapp_rust::download::MediaType::Video,
            MediaKind::Document => whatsapp_rust::download::MediaType::Document,
        };
        let upload = client
            .upload(media.data, media_type)
            .await
            .map_err(|e| SessionError::Delivery(format!("media upload failed: {e}")))?;

        let kind = media.kind;
        let msg = match kind {
            MediaKind::Image => waproto::whatsapp::Message {
                image_message: Some(Box::new(waproto::whatsapp::message::ImageMessage {
                    mimetype: Some(media.mime),
                    caption: media.caption,
                    url: Some(upload.url),
                    direct_path: Some(upload.direct_path),
                    media_key: Some(upload.media_key),
                    file_enc_sha256: Some(upload.file_enc_sha256),
                    file_sha256: Some(upload.file_sha256),
                    file_length: Some(upload.file_length),
                    ..Default::default()
                })),
                ..Default::default()
            },
            MediaKind::Video => waproto::whatsapp::Message {
                video_message: Some(Box::new(waproto::whatsapp::message::VideoMessage {
                    mimetype: Some(media.mime),
                    caption: media.caption,
                    url: Some(upload.url),
                    direct_path: Some(upload.direct_path),
                    media_key: Some(upload.media_key),
                    file_enc_sha256: Some(upload.file_enc_sha256),
                    file_sha256: Some(upload.file_sha256),
                    file_length: Some(upload.file_length),
                    ..Default::default()
                })),
                ..Default::default()
            },
            MediaKind::Document => waproto::whatsapp::Message {
                document_message: Some(Box::new(waproto::whatsapp::message::DocumentMessage {
                    mimetype: Some(media.mime),
                    caption: media.caption,
                    file_name: Some(media.filename),
                    url: Some(upload.url),
                    direct_path: Some(upload.direct_path),
                    media_key: Some(upload.media_key),
                    file_enc_sha256: Some(upload.file_enc_sha256),
                    file_sha256: Some(upload.file_sha256),
                    file_length: Some(upload.file_length),
                    ..Default::default()
                })),
                ..Default::default()
            },
        };

        let msg_id = client
            .send_message(jid, msg)
            .await
            .map_err(|e| SessionError::Delivery(e.to_string()))?;

        debug!(%to, %msg_id, kind = kind.label(), "media message delivered");
        Ok(())
    }
}
