//! Client-side error type for REST calls.

use thiserror::Error;

use crate::protocol::ApiEnvelope;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed.
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The body was not the JSON we expected.
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// The envelope said `"status": "error"`.
    #[error("{message}")]
    Api { message: String },
}

impl ApiError {
    /// A message suitable for a notification banner. Never empty.
    pub fn user_message(&self) -> String {
        let msg = match self {
            ApiError::Http { status, body } => match try_envelope_message(body) {
                Some(message) => message,
                None => format!("HTTP {status}"),
            },
            ApiError::Api { message } => message.clone(),
            other => other.to_string(),
        };
        if msg.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            msg
        }
    }
}

/// Pull the `message` out of an error envelope body, if there is one.
pub fn try_envelope_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ApiEnvelope>(body).ok()?;
    parsed.message.filter(|m| !m.trim().is_empty())
}
