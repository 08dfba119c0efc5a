//! Canonical user identifier.
//!
//! User identifiers reach the engine as JSON strings, JSON numbers, parsed
//! integers, and interpolated strings depending on where they were read
//! from. [`UserKey`] is the single normalized form; every ingress converts
//! into it and every comparison against stored data goes through
//! [`UserKey::matches`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Normalized string form of a user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Normalize a raw string. Blank input and the literal `null`/`undefined`
    /// placeholders yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('"').trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Normalize a JSON value. Strings are parsed, integral numbers are
    /// rendered without a fractional part, everything else is rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| Self(format!("{f:.0}")))
                }
            }
            _ => None,
        }
    }

    /// The canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as an integer, when it is one.
    pub fn as_integer(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Whether a stored owner identifier, in any representation, refers to
    /// this key.
    pub fn matches(&self, stored: &Value) -> bool {
        match Self::from_value(stored) {
            Some(other) if other == *self => true,
            Some(other) => match (self.as_integer(), other.as_integer()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            None => false,
        }
    }

    /// The key as a JSON string value, the only form ever written to storage.
    pub fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AppError::validation(format!("Invalid user identifier '{s}'")))
    }
}

impl From<i64> for UserKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for UserKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for UserKey {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<UserKey> for String {
    fn from(key: UserKey) -> String {
        key.0
    }
}

impl<'de> Deserialize<'de> for UserKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid user identifier: {value}")))
    }
}
