//! Retention sweep of read notifications.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use campus_core::result::AppResult;
use campus_core::types::{Document, Query, SortField, UserKey};
use campus_entity::notification::Notification;
use campus_entity::notification::model::fields;
use campus_service::AppContext;
use campus_store::keys;

/// Ledger document fields.
mod ledger {
    pub const LAST_RUN_AT: &str = "lastRunAt";
    pub const DELETED: &str = "deleted";
    pub const STATUS: &str = "status";
}

/// How a sweep invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStatus {
    /// Every selected notification was deleted.
    Completed,
    /// A deletion failed and the rest of the batch was skipped.
    Aborted,
    /// The previous run is too recent.
    Throttled,
    /// Retention is switched off.
    Disabled,
}

/// Result of one sweep invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Recipient the sweep was limited to, if any.
    pub scope: Option<String>,
    /// How the invocation ended.
    pub status: SweepStatus,
    /// Notifications fetched.
    pub examined: usize,
    /// Notifications past retention, before the batch cap.
    pub eligible: usize,
    /// Keys deleted, in deletion order.
    pub deleted: Vec<String>,
    /// Previous run recorded in the ledger.
    pub last_run: Option<DateTime<Utc>>,
}

impl SweepReport {
    fn skipped(scope: Option<&UserKey>, status: SweepStatus, last_run: Option<DateTime<Utc>>) -> Self {
        Self {
            scope: scope.map(|s| s.to_string()),
            status,
            examined: 0,
            eligible: 0,
            deleted: Vec::new(),
            last_run,
        }
    }
}

/// Deletes notifications that are read and older than the retention age.
///
/// Unread notifications are never touched. One invocation deletes at most
/// `batch_size` documents, sequentially; the first failed deletion stops the
/// batch and the remainder stays eligible for the next run.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    ctx: AppContext,
}

impl RetentionSweeper {
    /// Create a sweeper over a context.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Sweep `scope` (one recipient, or everyone) unless it was swept within
    /// the configured interval. Records the run in the ledger.
    pub async fn run_if_due(&self, scope: Option<&UserKey>) -> AppResult<SweepReport> {
        let config = &self.ctx.config().retention;
        if !config.enabled {
            return Ok(SweepReport::skipped(scope, SweepStatus::Disabled, None));
        }

        let last_run = self.last_run(scope).await?;
        let now = self.ctx.clock().now();
        if let Some(last) = last_run {
            let next_due = last + Duration::hours(config.min_interval_hours);
            if now < next_due {
                debug!(scope = ?scope.map(UserKey::as_str), %next_due, "Retention sweep not due");
                return Ok(SweepReport::skipped(scope, SweepStatus::Throttled, last_run));
            }
        }

        let mut report = self.sweep(scope).await?;
        report.last_run = last_run;
        self.record(scope, &report).await?;
        Ok(report)
    }

    /// Sweep `scope` now, ignoring the ledger.
    pub async fn sweep(&self, scope: Option<&UserKey>) -> AppResult<SweepReport> {
        let config = &self.ctx.config().retention;
        let now = self.ctx.clock().now();
        let max_age = Duration::days(config.max_age_days);

        let query = match scope {
            Some(recipient) => Query::collection(keys::NOTIFICATIONS)
                .where_eq(fields::RECIPIENT_ID, recipient.to_value()),
            None => Query::collection(keys::NOTIFICATIONS).where_eq(fields::READ, true),
        }
        .order_by(SortField::desc(fields::TIMESTAMP));

        let fetched = self.ctx.store().query(&query).await?;
        let examined = fetched.len();
        let eligible: Vec<String> = fetched
            .iter()
            .filter_map(|doc| Notification::from_stored(doc).ok())
            .filter(|n| n.read && n.age(now) > max_age)
            .map(|n| n.id)
            .collect();

        let mut report = SweepReport {
            scope: scope.map(|s| s.to_string()),
            status: SweepStatus::Completed,
            examined,
            eligible: eligible.len(),
            deleted: Vec::new(),
            last_run: None,
        };

        for id in eligible.into_iter().take(config.batch_size) {
            match self.ctx.store().delete(keys::NOTIFICATIONS, &id).await {
                Ok(_) => report.deleted.push(id),
                Err(e) => {
                    warn!(id = %id, error = %e, "Retention delete failed, stopping batch");
                    report.status = SweepStatus::Aborted;
                    break;
                }
            }
        }

        info!(
            scope = ?report.scope,
            examined = report.examined,
            eligible = report.eligible,
            deleted = report.deleted.len(),
            status = ?report.status,
            "Retention sweep finished"
        );
        Ok(report)
    }

    /// The last recorded run for `scope`.
    pub async fn last_run(&self, scope: Option<&UserKey>) -> AppResult<Option<DateTime<Utc>>> {
        let key = keys::cleanup_ledger(scope.map(UserKey::as_str));
        let doc = self.ctx.store().get(keys::MAINTENANCE, &key).await?;
        Ok(doc
            .and_then(|d| d.get(ledger::LAST_RUN_AT).and_then(Value::as_i64))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()))
    }

    async fn record(&self, scope: Option<&UserKey>, report: &SweepReport) -> AppResult<()> {
        let key = keys::cleanup_ledger(scope.map(UserKey::as_str));
        let mut entry = Document::new();
        entry.insert(
            ledger::LAST_RUN_AT.into(),
            Value::from(self.ctx.clock().now().timestamp_millis()),
        );
        entry.insert(ledger::DELETED.into(), Value::from(report.deleted.len()));
        entry.insert(ledger::STATUS.into(), serde_json::to_value(report.status)?);
        self.ctx.store().merge(keys::MAINTENANCE, &key, entry).await
    }
}
