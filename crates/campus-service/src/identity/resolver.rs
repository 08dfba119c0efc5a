//! Resolves the current user's canonical key from session state.

use serde_json::Value;
use tracing::{debug, warn};

use campus_core::traits::local_store::read_json;
use campus_core::types::UserKey;
use campus_store::keys;

use crate::context::AppContext;

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The in-memory authenticated user.
    Session,
    /// The locally persisted serialized user object.
    StoredUser,
    /// The locally persisted bare identifier.
    StoredUserId,
}

/// Resolves the acting user's identifier.
///
/// Sources are tried in order: in-memory session user, the persisted `user`
/// object, the persisted bare `userId`. The winner is written back under
/// `userId` so later lookups hit the cheapest source.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    ctx: AppContext,
}

impl IdentityResolver {
    /// Create a resolver over a context.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// The current user's key, or `None` when nothing identifies a user.
    /// `None` means notifications are disabled, not an error.
    pub async fn resolve(&self) -> Option<UserKey> {
        let (key, source) = self.resolve_with_source().await?;
        debug!(user = %key, ?source, "Resolved identity");
        Some(key)
    }

    /// Like [`resolve`](Self::resolve), also reporting the winning source.
    pub async fn resolve_with_source(&self) -> Option<(UserKey, IdentitySource)> {
        let found = self.candidate().await?;
        self.remember(&found.0).await;
        Some(found)
    }

    /// The current user's email, from the session or the persisted user.
    pub async fn email(&self) -> Option<String> {
        if let Some(email) = self.ctx.session_user().and_then(|u| u.email) {
            return Some(email);
        }
        let stored: Value = read_json(self.ctx.local().as_ref(), keys::USER).await?;
        stored
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    async fn candidate(&self) -> Option<(UserKey, IdentitySource)> {
        if let Some(key) = self
            .ctx
            .session_user()
            .and_then(|u| UserKey::from_value(&u.id))
        {
            return Some((key, IdentitySource::Session));
        }

        if let Some(stored) = read_json::<Value>(self.ctx.local().as_ref(), keys::USER).await {
            if let Some(key) = stored.get("id").and_then(UserKey::from_value) {
                return Some((key, IdentitySource::StoredUser));
            }
        }

        match self.ctx.local().get(keys::USER_ID).await {
            Ok(Some(raw)) => UserKey::parse(&raw).map(|key| (key, IdentitySource::StoredUserId)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user id");
                None
            }
        }
    }

    async fn remember(&self, key: &UserKey) {
        let local = self.ctx.local();
        if matches!(local.get(keys::USER_ID).await, Ok(Some(ref raw)) if raw == key.as_str()) {
            return;
        }
        if let Err(e) = local.set(keys::USER_ID, key.as_str()).await {
            warn!(user = %key, error = %e, "Failed to persist resolved user id");
        }
    }
}
