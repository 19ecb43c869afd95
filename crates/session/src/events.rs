//! Session lifecycle events and their terminal presentation.

use {
    tokio::sync::mpsc,
    tracing::{error, info, warn},
};

/// Lifecycle notifications emitted by the live session client.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A pairing QR code was issued (raw payload, rendered by the logger).
    QrCode(String),
    /// Pairing completed.
    Authenticated,
    /// Session connected and able to send.
    Ready,
    /// Authentication failed or the session was logged out remotely.
    AuthFailure(String),
    /// Transport dropped; the client reconnects on its own.
    Disconnected,
}

/// Consume session events and narrate them on the terminal. Runs until the
/// sending side is dropped.
///
/// Keeps pairing UX out of the HTTP layer: QR codes land here, rendered
/// scannable, instead of in a request handler.
pub async fn log_events(mut rx: mpsc::Receiver<SessionEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::QrCode(code) => match render_qr_terminal(&code) {
                Ok(qr) => {
                    info!("scan this QR code with WhatsApp (Linked Devices):");
                    println!("{qr}");
                },
                Err(e) => error!(error = %e, "failed to render pairing QR code"),
            },
            SessionEvent::Authenticated => info!("session authenticated"),
            SessionEvent::Ready => info!("session ready, messages can be sent"),
            SessionEvent::AuthFailure(reason) => error!(%reason, "session authentication failed"),
            SessionEvent::Disconnected => warn!("session disconnected"),
        }
    }
}

/// Render QR data for terminal display using unicode half-block characters.
/// Packing two module rows per text line keeps the code compact enough for
/// small terminals.
pub fn render_qr_terminal(data: &str) -> anyhow::Result<String> {
    use qrcode::{Color, EcLevel, QrCode};

    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| anyhow::anyhow!("QR encoding failed: {e}"))?;

    let width = code.width();
    let colors: Vec<Color> = code.into_colors();
    let is_dark =
        |row: usize, col: usize| row < width && col < width && colors[row * width + col] == Color::Dark;

    let mut out = String::new();
    let mut row = 0;
    while row < width {
        for col in 0..width {
            let top = is_dark(row, col);
            let bottom = is_dark(row + 1, col);
            out.push(match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
        row += 2;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nonempty_block_art() {
        let qr = match render_qr_terminal("wagate-pairing-test") {
            Ok(q) => q,
            Err(e) => panic!("render failed: {e}"),
        };
        assert!(!qr.is_empty());
        assert!(qr.chars().any(|c| matches!(c, '█' | '▀' | '▄')));
    }

    #[test]
    fn rendered_lines_share_width() {
        let qr = match render_qr_terminal("another-payload") {
            Ok(q) => q,
            Err(e) => panic!("render failed: {e}"),
        };
        let widths: Vec<usize> = qr.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn logger_exits_when_sender_drops() {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(log_events(rx));
        let _ = tx.send(SessionEvent::Ready).await;
        drop(tx);
        assert!(handle.await.is_ok());
    }
}
