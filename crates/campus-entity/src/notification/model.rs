//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use campus_core::result::AppResult;
use campus_core::types::{Document, StoredDocument, UserKey};

use super::kind::NotificationType;

/// Stored field names of a notification document.
pub mod fields {
    /// Addressing field the feed filters on.
    pub const RECIPIENT_ID: &str = "recipientId";
    /// Copy of the recipient kept for verification.
    pub const RECIPIENT_ID_VERIFY: &str = "recipientIdVerify";
    /// Title.
    pub const TITLE: &str = "title";
    /// Body.
    pub const MESSAGE: &str = "message";
    /// Notification type.
    pub const TYPE: &str = "type";
    /// Creation time in epoch milliseconds; the feed ordering key.
    pub const TIMESTAMP: &str = "timestamp";
    /// Read flag.
    pub const READ: &str = "read";
    /// When the read flag was flipped, epoch milliseconds.
    pub const READ_AT: &str = "readAt";
}

/// A notification directed at one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Document key.
    #[serde(skip)]
    pub id: String,
    /// The recipient.
    pub recipient_id: UserKey,
    /// Notification title.
    #[serde(default)]
    pub title: String,
    /// Notification body text.
    #[serde(default)]
    pub message: String,
    /// Notification type.
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    /// When the notification was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Whether the recipient has read it (remote view).
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Decode a stored notification document.
    pub fn from_stored(doc: &StoredDocument) -> AppResult<Self> {
        let mut notification: Self = doc.decode()?;
        notification.id = doc.key.clone();
        Ok(notification)
    }

    /// Age of the notification at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.timestamp
    }
}

/// A notification about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// The recipient.
    pub recipient_id: UserKey,
    /// Title.
    pub title: String,
    /// Body.
    pub message: String,
    /// Type.
    pub kind: NotificationType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Build the stored document: unread, with the recipient duplicated into
    /// the verification field.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::RECIPIENT_ID.into(), self.recipient_id.to_value());
        doc.insert(fields::RECIPIENT_ID_VERIFY.into(), self.recipient_id.to_value());
        doc.insert(fields::TITLE.into(), Value::String(self.title.clone()));
        doc.insert(fields::MESSAGE.into(), Value::String(self.message.clone()));
        doc.insert(fields::TYPE.into(), Value::String(self.kind.as_str().into()));
        doc.insert(
            fields::TIMESTAMP.into(),
            Value::from(self.created_at.timestamp_millis()),
        );
        doc.insert(fields::READ.into(), Value::Bool(false));
        doc
    }
}
