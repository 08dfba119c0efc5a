//! Notification emitter.

use chrono::Duration;
use tracing::{debug, info, warn};

use campus_core::result::AppResult;
use campus_core::types::UserKey;
use campus_entity::notification::{NewNotification, NotificationType};
use campus_store::keys;

use super::dedup;
use crate::context::AppContext;

/// What [`NotificationEmitter::emit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// A record was inserted under this key.
    Created(String),
    /// The recipient disabled this category; nothing was stored.
    DisabledByPreference,
    /// An identical record inside the dedup window already exists.
    Duplicate(String),
}

impl EmitOutcome {
    /// Whether a record was inserted.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Creates notification records on behalf of business flows.
#[derive(Debug, Clone)]
pub struct NotificationEmitter {
    ctx: AppContext,
}

impl NotificationEmitter {
    /// Create an emitter over a context.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Emit a notification to `recipient`.
    ///
    /// Critical types skip the preference check. When the recipient has no
    /// loadable preferences the emitter tries to initialize them and
    /// otherwise proceeds.
    pub async fn emit(
        &self,
        recipient: &UserKey,
        title: &str,
        message: &str,
        kind: NotificationType,
    ) -> AppResult<EmitOutcome> {
        let critical = self.ctx.config().notifications.is_critical(kind.as_str());
        if !critical && !self.allowed(recipient, kind).await {
            info!(recipient = %recipient, kind = %kind, "Notification disabled by preference");
            return Ok(EmitOutcome::DisabledByPreference);
        }

        let now = self.ctx.clock().now();
        let candidate = NewNotification {
            recipient_id: recipient.clone(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            created_at: now,
        };

        let window = Duration::seconds(self.ctx.config().notifications.dedup_window_seconds);
        match dedup::find_duplicate(self.ctx.store().as_ref(), &candidate, window, now).await {
            Ok(Some(existing)) => {
                debug!(recipient = %recipient, existing = %existing, "Suppressed duplicate notification");
                return Ok(EmitOutcome::Duplicate(existing));
            }
            Ok(None) => {}
            Err(e) => warn!(recipient = %recipient, error = %e, "Duplicate check failed, emitting anyway"),
        }

        let id = self
            .ctx
            .store()
            .add(keys::NOTIFICATIONS, candidate.to_document())
            .await?;
        info!(recipient = %recipient, kind = %kind, id = %id, "Notification created");
        Ok(EmitOutcome::Created(id))
    }

    async fn allowed(&self, recipient: &UserKey, kind: NotificationType) -> bool {
        let prefs = self.ctx.preferences();
        match prefs.lookup(recipient, kind).await {
            Ok(Some(enabled)) => enabled,
            Ok(None) => match prefs.initialize(recipient, None).await {
                Ok(initialized) => initialized.is_enabled(kind),
                Err(e) => {
                    warn!(recipient = %recipient, error = %e, "Could not initialize preferences, allowing");
                    true
                }
            },
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Could not load preferences, allowing");
                true
            }
        }
    }
}
