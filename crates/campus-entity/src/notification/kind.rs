//! Notification type enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use campus_core::error::AppError;

/// Category of a notification, also the key of its preference toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A user's role was changed.
    RoleUpdate,
    /// A document was uploaded.
    DocumentUploaded,
    /// A document was deleted.
    DocumentDeleted,
    /// A document was approved.
    DocumentApproved,
    /// A document was rejected.
    DocumentRejected,
    /// A document was updated.
    DocumentUpdated,
    /// A new chat message.
    ChatMessage,
    /// The user was mentioned in a chat.
    ChatMention,
    /// The user was added to a chat group.
    ChatGroupInvite,
    /// General information.
    #[default]
    Info,
    /// Critical system message; never subject to preferences.
    System,
    /// A type this build does not know.
    #[serde(other)]
    Unknown,
}

impl NotificationType {
    /// Every type that carries a preference toggle.
    pub const TOGGLEABLE: [Self; 10] = [
        Self::RoleUpdate,
        Self::DocumentUploaded,
        Self::DocumentDeleted,
        Self::DocumentApproved,
        Self::DocumentRejected,
        Self::DocumentUpdated,
        Self::ChatMessage,
        Self::ChatMention,
        Self::ChatGroupInvite,
        Self::Info,
    ];

    /// The stored string form, also the preference field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleUpdate => "ROLE_UPDATE",
            Self::DocumentUploaded => "DOCUMENT_UPLOADED",
            Self::DocumentDeleted => "DOCUMENT_DELETED",
            Self::DocumentApproved => "DOCUMENT_APPROVED",
            Self::DocumentRejected => "DOCUMENT_REJECTED",
            Self::DocumentUpdated => "DOCUMENT_UPDATED",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::ChatMention => "CHAT_MENTION",
            Self::ChatGroupInvite => "CHAT_GROUP_INVITE",
            Self::Info => "INFO",
            Self::System => "SYSTEM",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' ', '.'], "_");
        match normalized.as_str() {
            "ROLE_UPDATE" => Ok(Self::RoleUpdate),
            "DOCUMENT_UPLOADED" => Ok(Self::DocumentUploaded),
            "DOCUMENT_DELETED" => Ok(Self::DocumentDeleted),
            "DOCUMENT_APPROVED" => Ok(Self::DocumentApproved),
            "DOCUMENT_REJECTED" => Ok(Self::DocumentRejected),
            "DOCUMENT_UPDATED" => Ok(Self::DocumentUpdated),
            "CHAT_MESSAGE" => Ok(Self::ChatMessage),
            "CHAT_MENTION" => Ok(Self::ChatMention),
            "CHAT_GROUP_INVITE" => Ok(Self::ChatGroupInvite),
            "INFO" => Ok(Self::Info),
            "SYSTEM" | "CRITICAL" => Ok(Self::System),
            _ => Err(AppError::validation(format!("Unknown notification type '{s}'"))),
        }
    }
}
