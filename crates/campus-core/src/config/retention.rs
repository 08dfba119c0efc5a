//! Retention sweep configuration.

use serde::{Deserialize, Serialize};

/// Settings for deleting old read notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Whether the daemon schedules sweeps at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Read notifications strictly older than this many days are eligible.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
    /// Maximum deletions per sweep.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Minimum hours between two sweeps of the same scope.
    #[serde(default = "default_min_interval_hours")]
    pub min_interval_hours: i64,
    /// Delay in seconds before the first sweep after startup.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_seconds: u64,
    /// Cron expression (with seconds) for sweep attempts.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_days: default_max_age_days(),
            batch_size: default_batch_size(),
            min_interval_hours: default_min_interval_hours(),
            initial_delay_seconds: default_initial_delay(),
            schedule: default_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_age_days() -> i64 {
    30
}

fn default_batch_size() -> usize {
    20
}

fn default_min_interval_hours() -> i64 {
    24
}

fn default_initial_delay() -> u64 {
    5
}

fn default_schedule() -> String {
    "0 0 * * * *".to_string()
}
