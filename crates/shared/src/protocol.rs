//! REST envelope and WebSocket message shapes.

use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Envelope wrapped around every `/api/*` response.
///
/// Success: `{"status": "success", "data": ...}`.
/// Failure: `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ApiEnvelope {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data,
            message: None,
            version: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            data: serde_json::Value::Null,
            message: Some(message.into()),
            version: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// A server-pushed invalidation event, e.g.
/// `{"actionType": "skyportal/REFRESH_SOURCE", "payload": {"source_id": "ZTF20abc"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub action_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ServerMessage {
    pub fn new(action_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// Read a string-ish field from the payload. Numeric ids are stringified
    /// so `{"group_id": 3}` and `{"group_id": "3"}` compare the same way.
    pub fn payload_str(&self, field: &str) -> Option<String> {
        match self.payload.get(field)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// First frame sent after the socket opens when the client holds a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocketAuth {
    pub auth_token: String,
}
