//! Durable local projection of acknowledged notification ids.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;

use campus_core::traits::LocalStore;
use campus_store::keys;

/// Ids of notifications acknowledged on this installation.
///
/// Persisted as a comma-joined list. The set only grows; an id in the set
/// is read no matter what the remote flag says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<String>,
}

impl SeenSet {
    /// Parse the persisted form. Accepts the comma-joined list and, for
    /// older writers, a JSON array of strings. Anything else is empty.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('[') {
            return match serde_json::from_str::<Vec<Value>>(raw) {
                Ok(items) => items
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
                Err(_) => Self::default(),
            };
        }
        raw.split(',').collect()
    }

    /// Load from the local store; missing or unreadable entries yield an
    /// empty set.
    pub async fn load(local: &dyn LocalStore) -> Self {
        match local.get(keys::SEEN_NOTIFICATIONS).await {
            Ok(Some(raw)) => Self::parse(&raw),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read seen notifications");
                Self::default()
            }
        }
    }

    /// Write the set back to the local store.
    pub async fn persist(&self, local: &dyn LocalStore) {
        if let Err(e) = local.set(keys::SEEN_NOTIFICATIONS, &self.to_raw()).await {
            warn!(error = %e, "Failed to persist seen notifications");
        }
    }

    /// Comma-joined form.
    pub fn to_raw(&self) -> String {
        self.ids.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }

    /// Whether `id` has been acknowledged locally.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record an id. Returns `true` if it was new.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.trim().is_empty() {
            return false;
        }
        self.ids.insert(id)
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            set.insert(id.into().trim().to_string());
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for SeenSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}
