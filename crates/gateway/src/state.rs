//! Shared gateway state injected into request handlers.

use std::sync::Arc;

use {wagate_media::Fetcher, wagate_session::SessionClient};

/// State shared by all handlers: the session client handle and the media
/// fetcher. Cheap to clone per request.
#[derive(Clone)]
pub struct GatewayState {
    pub session: Arc<dyn SessionClient>,
    pub fetcher: Fetcher,
    pub version: &'static str,
}

impl GatewayState {
    pub fn new(session: Arc<dyn SessionClient>, fetcher: Fetcher) -> Self {
        Self {
            session,
            fetcher,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
