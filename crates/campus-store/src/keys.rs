//! Collection names and local store keys.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

// ── Document store collections ─────────────────────────────

/// Notification documents.
pub const NOTIFICATIONS: &str = "notifications";

/// One preference document per user, keyed by the canonical user key.
pub const NOTIFICATION_PREFERENCES: &str = "notificationPreferences";

/// Maintenance bookkeeping (sweep ledger).
pub const MAINTENANCE: &str = "maintenance";

// ── Local store keys ───────────────────────────────────────

/// Bearer token of the REST backend.
pub const TOKEN: &str = "token";

/// Serialized authenticated user object.
pub const USER: &str = "user";

/// Bare user identifier.
pub const USER_ID: &str = "userId";

/// Preferred UI language.
pub const PREFERRED_LANGUAGE: &str = "preferred_language";

/// Comma-joined ids of notifications acknowledged on this installation.
pub const SEEN_NOTIFICATIONS: &str = "seenNotifications";

/// Last computed unread count.
pub const UNREAD_NOTIFICATION_COUNT: &str = "unreadNotificationCount";

/// Mirror of the current user's preference document.
pub const NOTIFICATION_PREFERENCES_CACHE: &str = "notificationPreferences";

// ── Maintenance documents ──────────────────────────────────

/// Ledger document key for a sweep scope.
pub fn cleanup_ledger(scope: Option<&str>) -> String {
    match scope {
        Some(recipient) => format!("lastNotificationsCleanup:{recipient}"),
        None => "lastNotificationsCleanup".to_string(),
    }
}
