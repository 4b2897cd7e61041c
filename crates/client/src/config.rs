//! Client configuration from environment variables.

use std::time::Duration;

use url::Url;

use crate::ws::ReconnectConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_NOTIFICATION_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Root of the REST API, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// WebSocket endpoint for server pushes.
    pub ws_url: String,
    /// API token, sent on REST calls and as the socket's first frame.
    pub token: Option<String>,
    /// How long a notification stays up before it is hidden.
    pub notification_ttl: Duration,
    pub reconnect: ReconnectConfig,
}

impl PortalConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            ws_url: derive_ws_url(&base_url),
            base_url,
            token: None,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// Environment variables:
    /// - `SKYPORTAL_BASE_URL`: REST root (default: "http://localhost:5000")
    /// - `SKYPORTAL_WS_URL`: socket URL (default: derived from the base URL, path `/websocket`)
    /// - `SKYPORTAL_TOKEN`: API token (default: none)
    /// - `SKYPORTAL_NOTIFICATION_MS`: notification lifetime in ms (default: 3000)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SKYPORTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(ws_url) = std::env::var("SKYPORTAL_WS_URL") {
            config.ws_url = ws_url;
        }
        config.token = std::env::var("SKYPORTAL_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        if let Ok(raw) = std::env::var("SKYPORTAL_NOTIFICATION_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.notification_ttl = Duration::from_millis(ms),
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring SKYPORTAL_NOTIFICATION_MS"),
            }
        }

        config
    }

    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// `http://host:5000/` -> `ws://host:5000/websocket`
fn derive_ws_url(base_url: &str) -> String {
    let mut url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(base_url, error = %e, "cannot derive socket URL; using localhost");
            return "ws://localhost:5000/websocket".to_string();
        }
    };
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    // http(s) -> ws(s) is a permitted special-scheme change
    let _ = url.set_scheme(scheme);
    url.set_path("/websocket");
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_socket_url_from_base() {
        assert_eq!(
            derive_ws_url("http://localhost:5000/"),
            "ws://localhost:5000/websocket"
        );
        assert_eq!(
            derive_ws_url("https://portal.example.org"),
            "wss://portal.example.org/websocket"
        );
    }

    #[test]
    fn unparsable_base_falls_back() {
        assert_eq!(derive_ws_url("not a url"), "ws://localhost:5000/websocket");
    }

    #[test]
    fn builder_setters() {
        let config = PortalConfig::new("http://127.0.0.1:9000")
            .with_token("abc")
            .with_notification_ttl(Duration::from_millis(10));
        assert_eq!(config.ws_url, "ws://127.0.0.1:9000/websocket");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.notification_ttl, Duration::from_millis(10));
    }
}
