//! Merge of a remote batch with the local seen projection.

use tracing::{debug, warn};

use campus_core::types::StoredDocument;
use campus_entity::notification::{Notification, NotificationState};
use campus_service::{AppContext, SeenSet};
use campus_store::keys;

use super::snapshot::{FeedItem, FeedSnapshot};

/// Map a batch to feed items. Ids in `seen` are forced read; every item that
/// ends up read is added to `seen`. Store order is kept.
pub fn project(batch: &[StoredDocument], seen: &mut SeenSet) -> FeedSnapshot {
    let mut items = Vec::with_capacity(batch.len());
    for doc in batch {
        let notification = match Notification::from_stored(doc) {
            Ok(n) => n,
            Err(e) => {
                debug!(id = %doc.key, error = %e, "Skipping malformed notification");
                continue;
            }
        };
        let state = NotificationState::observed(notification.read, seen.contains(&notification.id));
        items.push(FeedItem {
            notification,
            state,
        });
    }

    seen.extend(items.iter().filter(|i| i.is_read()).map(|i| i.id().to_string()));
    FeedSnapshot::from_items(items)
}

/// Load the seen set, project the batch, and persist the seen union and the
/// unread count. The seen set stays locked until the union is written.
pub async fn apply(ctx: &AppContext, batch: &[StoredDocument]) -> FeedSnapshot {
    let local = ctx.local().as_ref();
    let guard = ctx.lock_seen().await;
    let mut seen = SeenSet::load(local).await;
    let before = seen.len();
    let snapshot = project(batch, &mut seen);
    if seen.len() != before {
        seen.persist(local).await;
    }
    drop(guard);
    if let Err(e) = local
        .set(
            keys::UNREAD_NOTIFICATION_COUNT,
            &snapshot.unread_count.to_string(),
        )
        .await
    {
        warn!(error = %e, "Failed to persist unread count");
    }
    snapshot
}
