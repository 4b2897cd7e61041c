//! REST calls that report their outcome through the store.
//!
//! Every call made through here dispatches, in order:
//!
//! 1. `T` (request started) with `parameters {endpoint, method, body}`
//! 2. exactly one of `T_OK` (with `data`) or `T_FAIL` (with `message`)
//!
//! and on failure additionally shows an error notification. The returned
//! [`ApiResponse`] never carries a Rust error: callers branch on it when
//! they care and ignore it when they don't.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::ActionContext;
use crate::resources::notifications::{self, Level};
use crate::store::{fail_type, ok_type, Action};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Success {
        #[serde(default)]
        data: Value,
    },
    Error {
        message: String,
    },
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success { data } => Some(data),
            ApiResponse::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Error { message } => Some(message),
        }
    }

    /// Decode the success payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.data()?.clone()).ok()
    }
}

/// Encode a typed request body.
///
/// A body that won't serialize never reaches the wire; the caller hands the
/// error response back as-is.
pub fn encode_body<T: Serialize>(value: &T) -> Result<Value, ApiResponse> {
    serde_json::to_value(value).map_err(|err| {
        tracing::warn!(error = %err, "request body did not serialize");
        ApiResponse::Error {
            message: format!("invalid request body: {err}"),
        }
    })
}

pub async fn get(ctx: &ActionContext, path: &str, kind: &str) -> ApiResponse {
    request(ctx, Method::GET, path, kind, None).await
}

pub async fn post(ctx: &ActionContext, path: &str, kind: &str, body: Value) -> ApiResponse {
    request(ctx, Method::POST, path, kind, Some(body)).await
}

pub async fn put(ctx: &ActionContext, path: &str, kind: &str, body: Value) -> ApiResponse {
    request(ctx, Method::PUT, path, kind, Some(body)).await
}

pub async fn patch(ctx: &ActionContext, path: &str, kind: &str, body: Value) -> ApiResponse {
    request(ctx, Method::PATCH, path, kind, Some(body)).await
}

pub async fn delete(ctx: &ActionContext, path: &str, kind: &str) -> ApiResponse {
    request(ctx, Method::DELETE, path, kind, None).await
}

pub async fn request(
    ctx: &ActionContext,
    method: Method,
    path: &str,
    kind: &str,
    body: Option<Value>,
) -> ApiResponse {
    let parameters = json!({
        "endpoint": path,
        "method": method.as_str(),
        "body": body,
    });
    ctx.dispatch(Action::new(kind).with_extra("parameters", parameters.clone()));

    match ctx.api().send(method.clone(), path, body.as_ref()).await {
        Ok(data) => {
            tracing::debug!(%method, path, action = kind, "request succeeded");
            ctx.dispatch(
                Action::with_data(ok_type(kind), data.clone()).with_extra("parameters", parameters),
            );
            ApiResponse::Success { data }
        }
        Err(err) => {
            let message = err.user_message();
            tracing::warn!(%method, path, action = kind, error = %err, "request failed");
            ctx.dispatch(
                Action::new(fail_type(kind))
                    .with_extra("parameters", parameters)
                    .with_extra("message", Value::String(message.clone())),
            );
            notifications::show_notification(ctx, format!("API error: {message}"), Level::Error);
            ApiResponse::Error { message }
        }
    }
}
