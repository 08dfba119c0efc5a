//! Notification emission configuration.

use serde::{Deserialize, Serialize};

/// Settings for notification emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Window in seconds within which an identical notification is
    /// suppressed as a duplicate.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: i64,
    /// Stored type names that are delivered regardless of recipient
    /// preferences.
    #[serde(default = "default_critical_categories")]
    pub critical_categories: Vec<String>,
}

impl NotificationsConfig {
    /// Whether notifications of the stored type `kind` bypass preferences.
    pub fn is_critical(&self, kind: &str) -> bool {
        self.critical_categories
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(kind))
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            dedup_window_seconds: default_dedup_window(),
            critical_categories: default_critical_categories(),
        }
    }
}

fn default_dedup_window() -> i64 {
    300
}

fn default_critical_categories() -> Vec<String> {
    vec!["SYSTEM".to_string()]
}
