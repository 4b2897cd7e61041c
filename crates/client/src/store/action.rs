//! Actions: tagged messages that describe a state change.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const OK_SUFFIX: &str = "_OK";
pub const FAIL_SUFFIX: &str = "_FAIL";

/// `{"type": "...", "data": ..., ...extra}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: Value::Null,
            extra: Map::new(),
        }
    }

    pub fn with_data(kind: impl Into<String>, data: Value) -> Self {
        Self {
            data,
            ..Self::new(kind)
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Decode `data` into a typed payload.
    ///
    /// A payload that doesn't match is logged and yields `None`; reducers
    /// treat that as "leave the slice alone".
    pub fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_value(self.data.clone()) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(action = %self.kind, error = %e, "malformed action payload");
                None
            }
        }
    }

    /// Like [`Action::payload`], but fields of the request body that produced
    /// this action fill in whatever the response left out.
    pub fn merged_payload<T: DeserializeOwned>(&self) -> Option<T> {
        let mut merged = match self.request_body() {
            Some(Value::Object(body)) => body.clone(),
            _ => return self.payload(),
        };
        match &self.data {
            Value::Object(data) => {
                for (k, v) in data {
                    merged.insert(k.clone(), v.clone());
                }
            }
            Value::Null => {}
            _ => return self.payload(),
        }
        match serde_json::from_value(Value::Object(merged)) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(action = %self.kind, error = %e, "malformed action payload");
                None
            }
        }
    }

    /// The `parameters` the HTTP wrapper attached to a request family action.
    pub fn parameters(&self) -> Option<&Value> {
        self.extra.get("parameters")
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.parameters()?.get("endpoint")?.as_str()
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.parameters()?.get("body").filter(|b| !b.is_null())
    }

    pub fn message(&self) -> Option<&str> {
        self.extra.get("message")?.as_str()
    }
}

/// `skyportal/FETCH_GROUPS` -> `skyportal/FETCH_GROUPS_OK`
pub fn ok_type(kind: &str) -> String {
    format!("{kind}{OK_SUFFIX}")
}

/// `skyportal/FETCH_GROUPS` -> `skyportal/FETCH_GROUPS_FAIL`
pub fn fail_type(kind: &str) -> String {
    format!("{kind}{FAIL_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_extra_fields_flat() {
        let action = Action::with_data("skyportal/FETCH_GROUP_OK", json!({"id": 3}))
            .with_extra("parameters", json!({"endpoint": "/api/groups/3"}));
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "skyportal/FETCH_GROUP_OK");
        assert_eq!(value["data"]["id"], 3);
        assert_eq!(value["parameters"]["endpoint"], "/api/groups/3");
        assert_eq!(action.endpoint(), Some("/api/groups/3"));
    }

    #[test]
    fn null_data_is_omitted() {
        let value = serde_json::to_value(Action::new("baselayer/HIDE_ALL")).unwrap();
        assert_eq!(value, json!({"type": "baselayer/HIDE_ALL"}));
    }

    #[test]
    fn merged_payload_prefers_response_fields() {
        #[derive(Deserialize)]
        struct Named {
            id: i64,
            name: String,
        }
        let action = Action::with_data("skyportal/ADD_GROUP_OK", json!({"id": 9}))
            .with_extra(
                "parameters",
                json!({"endpoint": "/api/groups", "body": {"id": 0, "name": "Stellar"}}),
            );
        let named: Named = action.merged_payload().unwrap();
        assert_eq!(named.id, 9);
        assert_eq!(named.name, "Stellar");
    }

    #[test]
    fn family_tags() {
        assert_eq!(ok_type("skyportal/FETCH_SOURCE"), "skyportal/FETCH_SOURCE_OK");
        assert_eq!(fail_type("skyportal/FETCH_SOURCE"), "skyportal/FETCH_SOURCE_FAIL");
    }
}
