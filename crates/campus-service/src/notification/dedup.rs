//! Emit-time duplicate suppression.
//!
//! Callers are not idempotent and may fire the same logical event from
//! several code paths, so the emitter checks for a recent identical record
//! before inserting.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use campus_core::result::AppResult;
use campus_core::traits::DocumentStore;
use campus_core::types::Query;
use campus_entity::notification::model::fields;
use campus_entity::notification::{NewNotification, Notification};
use campus_store::keys;

/// Whether `existing` duplicates `candidate` within `window` at `now`.
///
/// Recipient, title and type are already equal by query; the message must
/// match exactly and the existing record must be strictly younger than the
/// window. Records stamped in the future count as fresh.
pub fn is_duplicate(
    existing: &Notification,
    candidate: &NewNotification,
    window: Duration,
    now: DateTime<Utc>,
) -> bool {
    existing.message == candidate.message && existing.age(now) < window
}

/// Key of a stored notification duplicating `candidate`, if any.
pub async fn find_duplicate(
    store: &dyn DocumentStore,
    candidate: &NewNotification,
    window: Duration,
    now: DateTime<Utc>,
) -> AppResult<Option<String>> {
    let query = Query::collection(keys::NOTIFICATIONS)
        .where_eq(fields::RECIPIENT_ID, candidate.recipient_id.to_value())
        .where_eq(fields::TITLE, candidate.title.clone())
        .where_eq(fields::TYPE, candidate.kind.as_str());

    let found = store
        .query(&query)
        .await?
        .iter()
        .filter_map(|doc| match Notification::from_stored(doc) {
            Ok(n) => Some(n),
            Err(e) => {
                debug!(id = %doc.key, error = %e, "Skipping malformed notification");
                None
            }
        })
        .find(|n| is_duplicate(n, candidate, window, now))
        .map(|n| n.id);
    Ok(found)
}
