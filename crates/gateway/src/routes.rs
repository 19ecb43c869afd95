//! Request handlers: payload translation between the REST surface and the
//! session client.

use {
    axum::{Json, extract::State},
    base64::Engine,
    serde::Deserialize,
    serde_json::{Value, json},
    tracing::info,
};

use {
    wagate_media::mime,
    wagate_session::{ChatId, MediaKind, OutboundMedia},
};

use crate::{error::ApiError, state::GatewayState};

// ── Request shapes ───────────────────────────────────────────────────────────

/// Fields are optional so absence maps to a 400 with a field list instead of
/// a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Shared by the base64 and URL media endpoints; exactly one of `base64` /
/// `url` is consulted depending on the route.
#[derive(Debug, Deserialize)]
pub struct SendMediaRequest {
    pub phone: Option<String>,
    pub base64: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
    pub filename: Option<String>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

async fn ensure_ready(state: &GatewayState) -> Result<(), ApiError> {
    if state.session.status().await.ready {
        Ok(())
    } else {
        Err(ApiError::SessionNotReady)
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>, ApiError> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

/// Default filename per kind; documents have none, their filename is a
/// required field.
fn resolve_filename(kind: MediaKind, filename: Option<String>) -> Option<String> {
    filename.or_else(|| match kind {
        MediaKind::Image => Some("image.jpg".into()),
        MediaKind::Video => Some("video.mp4".into()),
        MediaKind::Document => None,
    })
}

fn required_inline(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Document => "phone, base64, filename",
        _ => "phone, base64",
    }
}

fn required_url(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Document => "phone, url, filename",
        _ => "phone, url",
    }
}

/// Resolve MIME from the filename and hand the payload to the session.
async fn deliver(
    state: &GatewayState,
    chat: &ChatId,
    phone: &str,
    kind: MediaKind,
    data: Vec<u8>,
    filename: String,
    caption: Option<String>,
) -> Result<Json<Value>, ApiError> {
    let media = OutboundMedia {
        kind,
        mime: mime::from_filename(&filename).to_string(),
        data,
        filename,
        caption,
    };
    state.session.send_media(chat, media).await?;

    info!(phone, kind = kind.label(), "media message sent");
    Ok(Json(json!({
        "success": true,
        "message": format!("{} sent", kind.label()),
    })))
}

async fn send_media_inline(
    state: GatewayState,
    kind: MediaKind,
    req: SendMediaRequest,
) -> Result<Json<Value>, ApiError> {
    let filename = resolve_filename(kind, req.filename);
    let (Some(phone), Some(data), Some(filename)) = (req.phone, req.base64, filename) else {
        return Err(ApiError::MissingFields(required_inline(kind)));
    };

    ensure_ready(&state).await?;
    let chat = ChatId::from_phone(&phone)?;
    let bytes = decode_base64(&data)?;
    deliver(&state, &chat, &phone, kind, bytes, filename, req.caption).await
}

async fn send_media_url(
    state: GatewayState,
    kind: MediaKind,
    req: SendMediaRequest,
) -> Result<Json<Value>, ApiError> {
    let filename = resolve_filename(kind, req.filename);
    let (Some(phone), Some(url), Some(filename)) = (req.phone, req.url, filename) else {
        return Err(ApiError::MissingFields(required_url(kind)));
    };

    ensure_ready(&state).await?;
    let chat = ChatId::from_phone(&phone)?;
    let bytes = state
        .fetcher
        .download(&url)
        .await
        .map_err(|e| ApiError::UpstreamFetch(e.to_string()))?;
    deliver(&state, &chat, &phone, kind, bytes, filename, req.caption).await
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /enviar-mensaje
pub async fn send_text(
    State(state): State<GatewayState>,
    Json(req): Json<SendTextRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(phone), Some(message)) = (req.phone, req.message) else {
        return Err(ApiError::MissingFields("phone, message"));
    };

    ensure_ready(&state).await?;
    let chat = ChatId::from_phone(&phone)?;
    state.session.send_text(&chat, &message).await?;

    info!(%phone, "text message sent");
    Ok(Json(json!({
        "success": true,
        "message": "message sent",
        "phone": phone,
    })))
}

/// POST /enviar-imagen-base64
pub async fn send_image_base64(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_inline(state, MediaKind::Image, req).await
}

/// POST /enviar-imagen-url
pub async fn send_image_url(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_url(state, MediaKind::Image, req).await
}

/// POST /enviar-video-base64
pub async fn send_video_base64(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_inline(state, MediaKind::Video, req).await
}

/// POST /enviar-video-url
pub async fn send_video_url(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_url(state, MediaKind::Video, req).await
}

/// POST /enviar-documento-base64
pub async fn send_document_base64(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_inline(state, MediaKind::Document, req).await
}

/// POST /enviar-documento-url
pub async fn send_document_url(
    State(state): State<GatewayState>,
    Json(req): Json<SendMediaRequest>,
) -> Result<Json<Value>, ApiError> {
    send_media_url(state, MediaKind::Document, req).await
}

/// GET /health — process liveness, no side effects.
pub async fn health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": state.version,
        "message": "gateway running",
    }))
}

/// GET /status — session readiness and identity.
pub async fn status(State(state): State<GatewayState>) -> Json<Value> {
    let status = state.session.status().await;
    let info = status.identity.map(|id| {
        json!({
            "number": id.number,
            "display_name": id.display_name,
        })
    });

    if status.ready {
        Json(json!({
            "status": "ready",
            "info": info,
            "message": "session ready to send messages",
        }))
    } else {
        Json(json!({
            "status": "not_ready",
            "info": Value::Null,
            "message": "scan the pairing QR code and wait for the session to connect",
        }))
    }
}
