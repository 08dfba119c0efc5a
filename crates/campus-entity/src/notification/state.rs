//! Per-notification lifecycle.

use serde::{Deserialize, Serialize};

use campus_core::error::AppError;

/// Lifecycle of one notification as seen by its recipient.
///
/// States only move forward: `Created → Delivered → AcknowledgedLocal →
/// AcknowledgedRemote → Purged`. Steps may be skipped (a notification read
/// on another installation arrives already `AcknowledgedRemote`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    /// Inserted, not yet observed by the recipient's feed.
    Created,
    /// Observed by the feed, unread.
    Delivered,
    /// Marked read in the local seen projection; remote flag may lag.
    AcknowledgedLocal,
    /// Remote read flag is set.
    AcknowledgedRemote,
    /// Removed by the retention sweep.
    Purged,
}

impl NotificationState {
    /// State of a notification present in a feed batch.
    pub fn observed(remote_read: bool, seen_locally: bool) -> Self {
        match (remote_read, seen_locally) {
            (true, _) => Self::AcknowledgedRemote,
            (false, true) => Self::AcknowledgedLocal,
            (false, false) => Self::Delivered,
        }
    }

    /// Move to `next`, rejecting any backward step.
    pub fn advance(self, next: Self) -> Result<Self, AppError> {
        if next < self {
            return Err(AppError::validation(format!(
                "Illegal notification transition {self:?} -> {next:?}"
            )));
        }
        Ok(next)
    }

    /// Whether the recipient should see this notification as read.
    pub fn is_read(&self) -> bool {
        *self >= Self::AcknowledgedLocal
    }
}
