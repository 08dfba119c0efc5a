//! Document store and local store configuration.

use serde::{Deserialize, Serialize};

/// Remote document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file the in-memory store is snapshotted to. `None` keeps the
    /// store purely in memory.
    #[serde(default)]
    pub snapshot_path: Option<String>,
    /// Buffer size of the change channel that feeds live queries.
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            change_buffer: default_change_buffer(),
        }
    }
}

/// Local key/value store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalStoreConfig {
    /// JSON file backing the local store. `None` keeps it in memory.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_change_buffer() -> usize {
    256
}
