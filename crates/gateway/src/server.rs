//! Router assembly and server startup.

use std::net::SocketAddr;

use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{routes, state::GatewayState};

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: GatewayState, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/enviar-mensaje", post(routes::send_text))
        .route("/enviar-imagen-base64", post(routes::send_image_base64))
        .route("/enviar-imagen-url", post(routes::send_image_url))
        .route("/enviar-video-base64", post(routes::send_video_base64))
        .route("/enviar-video-url", post(routes::send_video_url))
        .route("/enviar-documento-base64", post(routes::send_document_base64))
        .route("/enviar-documento-url", post(routes::send_document_url))
        .route("/health", get(routes::health))
        .route("/status", get(routes::status))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and run the HTTP server until the process exits.
pub async fn serve(
    bind: &str,
    port: u16,
    body_limit_bytes: usize,
    state: GatewayState,
) -> anyhow::Result<()> {
    let version = state.version;
    let app = build_app(state, body_limit_bytes);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let lines = [format!("wagate v{version}"), format!("listening on {addr}")];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}
