//! HTTP transport for the portal's REST API.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use skyportal_shared::{ApiEnvelope, ApiError};

/// Issues one request and unwraps the `{status, data, message}` envelope.
///
/// This layer knows nothing about actions; see [`crate::api`] for the
/// wrapper that turns outcomes into dispatches.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: String::new(),
            token: None,
        }
    }

    /// Set the base URL for API requests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send `Authorization: token <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        }
    }

    /// Send a request and return the envelope's `data` on success.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut rb = self.client.request(method, &url);

        if let Some(token) = &self.token {
            rb = rb.header(AUTHORIZATION, format!("token {token}"));
        }
        if let Some(body) = body {
            rb = rb.json(body);
        }

        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            return Err(ApiError::Http { status, body: text });
        }

        let envelope: ApiEnvelope =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))?;

        if !envelope.is_success() {
            return Err(ApiError::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("{} returned status {}", path, envelope.status)),
            });
        }

        Ok(envelope.data)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
