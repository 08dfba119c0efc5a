//! Per-user notification preference document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use campus_core::types::{Document, UserKey};

use super::kind::NotificationType;

/// Stored field names of a preference document.
pub mod fields {
    /// Owner identifier, in whatever representation the writer used.
    pub const USER_ID: &str = "userId";
    /// Owner email, secondary correlation key.
    pub const EMAIL: &str = "email";
    /// Last toggle change, epoch milliseconds.
    pub const LAST_UPDATED: &str = "lastUpdated";
    /// Last initialization by the owner, epoch milliseconds.
    pub const LAST_LOGIN: &str = "lastLogin";
    /// Last reset to defaults, epoch milliseconds.
    pub const LAST_RESET: &str = "lastReset";
    /// Key of the document this one was copied from.
    pub const MIGRATED_FROM: &str = "migratedFrom";
    /// Set when the document was rebuilt from a local cache entry.
    pub const RESTORED_FROM_CACHE: &str = "restoredFromCache";
}

/// Notification preferences of one user.
///
/// Kept as the raw document so fields written by other clients survive a
/// read-modify-write cycle. A category missing from the document is enabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPreferences {
    data: Document,
}

impl NotificationPreferences {
    /// Fresh preferences with every category enabled.
    pub fn defaults(owner: &UserKey, email: Option<&str>, now: DateTime<Utc>) -> Self {
        let mut data = Document::new();
        data.insert(fields::USER_ID.into(), owner.to_value());
        if let Some(email) = email {
            data.insert(fields::EMAIL.into(), Value::String(email.to_string()));
        }
        for kind in NotificationType::TOGGLEABLE {
            data.insert(kind.as_str().into(), Value::Bool(true));
        }
        let millis = Value::from(now.timestamp_millis());
        data.insert(fields::LAST_UPDATED.into(), millis.clone());
        data.insert(fields::LAST_LOGIN.into(), millis.clone());
        data.insert(fields::LAST_RESET.into(), millis);
        Self { data }
    }

    /// Wrap a stored document.
    pub fn from_document(data: Document) -> Self {
        Self { data }
    }

    /// The raw document.
    pub fn as_document(&self) -> &Document {
        &self.data
    }

    /// Consume into the raw document.
    pub fn into_document(self) -> Document {
        self.data
    }

    /// The stored owner identifier, as stored.
    pub fn owner(&self) -> Option<&Value> {
        self.data.get(fields::USER_ID)
    }

    /// The stored owner email.
    pub fn email(&self) -> Option<&str> {
        self.data.get(fields::EMAIL).and_then(Value::as_str)
    }

    /// Whether this document belongs to `identity` by owner id, or to `email`
    /// by case-insensitive email equality.
    pub fn belongs_to(&self, identity: &UserKey, email: Option<&str>) -> bool {
        if self.owner().is_some_and(|owner| identity.matches(owner)) {
            return true;
        }
        match (self.email(), email) {
            (Some(stored), Some(wanted)) => {
                !wanted.trim().is_empty() && stored.trim().eq_ignore_ascii_case(wanted.trim())
            }
            _ => false,
        }
    }

    /// The explicit toggle for a category, if one is stored.
    pub fn category(&self, kind: NotificationType) -> Option<bool> {
        self.data.get(kind.as_str()).and_then(Value::as_bool)
    }

    /// Whether a category is enabled; absence means enabled.
    pub fn is_enabled(&self, kind: NotificationType) -> bool {
        self.category(kind).unwrap_or(true)
    }

    /// Set a category toggle.
    pub fn set_category(&mut self, kind: NotificationType, enabled: bool) {
        self.data.insert(kind.as_str().into(), Value::Bool(enabled));
    }

    /// Every stored boolean toggle for a known category.
    pub fn categories(&self) -> BTreeMap<NotificationType, bool> {
        NotificationType::TOGGLEABLE
            .iter()
            .filter_map(|kind| self.category(*kind).map(|enabled| (*kind, enabled)))
            .collect()
    }

    /// Set a field.
    pub fn insert(&mut self, field: &str, value: Value) {
        self.data.insert(field.to_string(), value);
    }
}
