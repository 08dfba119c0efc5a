//! Request and response bodies of the REST backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Credentials for `/login_check`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login name (the account email).
    pub username: String,
    /// Password.
    pub password: String,
}

/// Response of `/login_check`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
}

/// A reference-list entry such as a formation or specialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Identifier as returned.
    pub id: Value,
    /// Display name.
    #[serde(default, alias = "title", alias = "label")]
    pub name: String,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier; absent on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Start, as the backend formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End, as the backend formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope keys list endpoints may wrap their items in.
const LIST_ENVELOPES: [&str; 4] = ["hydra:member", "member", "data", "items"];

/// Decode a list response that is either a bare array or an object wrapping
/// one. Entries that fail to decode are dropped; anything else yields an
/// empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(what: &str, body: Value) -> Vec<T> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match LIST_ENVELOPES
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }) {
            Some(items) => items,
            None => {
                warn!(what, "List response has no item array");
                return Vec::new();
            }
        },
        other => {
            warn!(what, kind = %json_kind(&other), "Unexpected list response");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() != total {
        warn!(what, dropped = total - decoded.len(), "Dropped malformed list entries");
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
