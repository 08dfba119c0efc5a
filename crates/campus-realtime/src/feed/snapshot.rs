//! Feed view models.

use campus_entity::notification::{Notification, NotificationState};

/// One notification as the recipient sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// The stored notification.
    pub notification: Notification,
    /// Lifecycle state merged from the remote flag and the seen set.
    pub state: NotificationState,
}

impl FeedItem {
    /// Whether the item displays as read.
    pub fn is_read(&self) -> bool {
        self.state.is_read()
    }

    /// Document key.
    pub fn id(&self) -> &str {
        &self.notification.id
    }
}

/// The feed at one point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedSnapshot {
    /// Items, newest first.
    pub items: Vec<FeedItem>,
    /// Items not displayed as read.
    pub unread_count: usize,
    /// Whether the first batch is still pending.
    pub loading: bool,
}

impl FeedSnapshot {
    /// Before the first batch arrives.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// An empty, settled feed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from items, computing the unread count.
    pub fn from_items(items: Vec<FeedItem>) -> Self {
        let unread_count = items.iter().filter(|i| !i.is_read()).count();
        Self {
            items,
            unread_count,
            loading: false,
        }
    }
}
