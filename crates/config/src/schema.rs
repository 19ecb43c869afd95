//! Config schema (gateway listener, media fetching, session client).

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WagateConfig {
    pub gateway: GatewaySection,
    pub media: MediaSection,
    pub session: SessionSection,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Bind address for the HTTP listener.
    pub bind: String,

    /// TCP port. A `PORT` environment variable passed to the CLI wins.
    pub port: u16,

    /// Maximum accepted request body size, in megabytes. Inline base64
    /// payloads arrive in the body, so this bounds sendable media size.
    pub body_limit_mb: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3001,
            body_limit_mb: 50,
        }
    }
}

/// Remote media fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSection {
    /// Timeout for downloading a remote file, in seconds.
    pub fetch_timeout_secs: u64,

    /// Maximum size of a downloaded remote file, in megabytes.
    pub max_fetch_mb: usize,
}

impl Default for MediaSection {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            max_fetch_mb: 50,
        }
    }
}

/// Session client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Path to the session device store. Defaults to `<data_dir>/session.db`.
    pub store_path: Option<String>,

    /// Device name shown in WhatsApp's linked-devices list.
    /// Defaults to "wagate".
    pub device_name: Option<String>,
}
