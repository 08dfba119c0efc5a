//! Acknowledgement of notifications by their recipient.
//!
//! The seen set is written first so the local acknowledgement survives a
//! failed or lagging remote write; the feed then keeps showing the item as
//! read until the remote flag catches up.

use serde_json::Value;
use tracing::{info, warn};

use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::types::{Document, Query, StoredDocument, UserKey};
use campus_entity::notification::model::fields;
use campus_entity::notification::{Notification, NotificationState};
use campus_store::keys;

use super::seen::SeenSet;
use crate::context::AppContext;

/// Read-state operations for one installation.
#[derive(Debug, Clone)]
pub struct Inbox {
    ctx: AppContext,
}

impl Inbox {
    /// Create an inbox over a context.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Mark one notification read and return its resulting state.
    ///
    /// Fails with `NotFound` when the notification does not exist or is
    /// addressed to someone else.
    pub async fn mark_read(&self, recipient: &UserKey, id: &str) -> AppResult<NotificationState> {
        let doc = self
            .ctx
            .store()
            .get(keys::NOTIFICATIONS, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        let notification =
            Notification::from_stored(&StoredDocument::new(id, doc))?;
        if notification.recipient_id != *recipient {
            return Err(AppError::not_found(format!(
                "Notification {id} not found for {recipient}"
            )));
        }

        let local = self.ctx.local();
        let guard = self.ctx.lock_seen().await;
        let mut seen = SeenSet::load(local.as_ref()).await;
        let mut state = NotificationState::observed(notification.read, seen.contains(id));

        if seen.insert(id) {
            seen.persist(local.as_ref()).await;
        }
        drop(guard);
        state = state.advance(state.max(NotificationState::AcknowledgedLocal))?;
        if state == NotificationState::AcknowledgedRemote {
            return Ok(state);
        }

        match self.flip_remote(id).await {
            Ok(()) => {
                state = state.advance(NotificationState::AcknowledgedRemote)?;
                info!(recipient = %recipient, id = %id, "Notification marked read");
            }
            Err(e) => warn!(id = %id, error = %e, "Remote read flag not updated, kept local acknowledgement"),
        }
        Ok(state)
    }

    /// Mark every unread notification of `recipient` read. Returns how many
    /// remote records were flipped.
    pub async fn mark_all_read(&self, recipient: &UserKey) -> AppResult<usize> {
        let query = Query::collection(keys::NOTIFICATIONS)
            .where_eq(fields::RECIPIENT_ID, recipient.to_value());
        let unread: Vec<String> = self
            .ctx
            .store()
            .query(&query)
            .await?
            .iter()
            .filter_map(|doc| Notification::from_stored(doc).ok())
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();

        let local = self.ctx.local();
        {
            let _guard = self.ctx.lock_seen().await;
            let mut seen = SeenSet::load(local.as_ref()).await;
            seen.extend(unread.iter().cloned());
            seen.persist(local.as_ref()).await;
        }

        let mut flipped = 0;
        for id in &unread {
            match self.flip_remote(id).await {
                Ok(()) => flipped += 1,
                Err(e) => warn!(id = %id, error = %e, "Remote read flag not updated"),
            }
        }
        if let Err(e) = local.set(keys::UNREAD_NOTIFICATION_COUNT, "0").await {
            warn!(error = %e, "Failed to persist unread count");
        }
        info!(recipient = %recipient, flipped, "Marked all notifications read");
        Ok(flipped)
    }

    async fn flip_remote(&self, id: &str) -> AppResult<()> {
        let mut update = Document::new();
        update.insert(fields::READ.into(), Value::Bool(true));
        update.insert(
            fields::READ_AT.into(),
            Value::from(self.ctx.clock().now().timestamp_millis()),
        );
        self.ctx
            .store()
            .merge(keys::NOTIFICATIONS, id, update)
            .await
    }
}
