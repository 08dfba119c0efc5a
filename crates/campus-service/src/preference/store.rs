//! Preference store accessor.
//!
//! The document store has no uniqueness constraint, so one logical user may
//! own preference documents under several keys (numeric vs string ids,
//! stale migrations). [`PreferenceStore::initialize`] reconciles them onto
//! the canonical key before anything reads or writes toggles.

use serde_json::Value;
use tracing::{debug, info, warn};

use campus_core::result::AppResult;
use campus_core::traits::local_store::{read_json, write_json};
use campus_core::types::{Document, Query, UserKey};
use campus_entity::notification::NotificationType;
use campus_entity::notification::preference::{NotificationPreferences, fields};
use campus_store::keys;

use super::error::PreferenceError;
use crate::context::AppContext;

/// Reads and writes per-user category toggles.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    ctx: AppContext,
}

impl PreferenceStore {
    /// Create an accessor over a context.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Make sure `identity` has a preference document under its canonical
    /// key and return it. Idempotent.
    ///
    /// Lookup order: the canonical key; any other document whose owner id
    /// (in any representation) or email matches, copied to the canonical key
    /// and left in place; the local cache mirror, restored server-side; and
    /// finally fresh all-enabled defaults.
    pub async fn initialize(
        &self,
        identity: &UserKey,
        email: Option<&str>,
    ) -> AppResult<NotificationPreferences> {
        let store = self.ctx.store();
        let key = identity.as_str();
        let now = self.ctx.clock().now().timestamp_millis();

        if let Some(existing) = store.get(keys::NOTIFICATION_PREFERENCES, key).await? {
            let mut refresh = Document::new();
            refresh.insert(fields::USER_ID.into(), identity.to_value());
            refresh.insert(fields::LAST_LOGIN.into(), Value::from(now));
            if let Some(email) = email {
                refresh.insert(fields::EMAIL.into(), Value::String(email.to_string()));
            }
            store
                .merge(keys::NOTIFICATION_PREFERENCES, key, refresh.clone())
                .await?;

            let mut prefs = NotificationPreferences::from_document(existing);
            for (field, value) in refresh {
                prefs.insert(&field, value);
            }
            debug!(user = %identity, "Preferences already initialized");
            self.mirror(&prefs).await;
            return Ok(prefs);
        }

        let all = store
            .query(&Query::collection(keys::NOTIFICATION_PREFERENCES))
            .await?;
        let migrated = all.into_iter().find_map(|doc| {
            let prefs = NotificationPreferences::from_document(doc.data);
            prefs.belongs_to(identity, email).then_some((doc.key, prefs))
        });

        if let Some((old_key, mut prefs)) = migrated {
            prefs.insert(fields::USER_ID, identity.to_value());
            prefs.insert(fields::MIGRATED_FROM, Value::String(old_key.clone()));
            prefs.insert(fields::LAST_LOGIN, Value::from(now));
            if let Some(email) = email {
                prefs.insert(fields::EMAIL, Value::String(email.to_string()));
            }
            store
                .set(keys::NOTIFICATION_PREFERENCES, key, prefs.as_document().clone())
                .await?;
            info!(user = %identity, from = %old_key, "Migrated preferences to canonical key");
            self.mirror(&prefs).await;
            return Ok(prefs);
        }

        if let Some(mut prefs) = self.cached(identity, email).await {
            prefs.insert(fields::USER_ID, identity.to_value());
            prefs.insert(fields::RESTORED_FROM_CACHE, Value::Bool(true));
            prefs.insert(fields::LAST_LOGIN, Value::from(now));
            store
                .set(keys::NOTIFICATION_PREFERENCES, key, prefs.as_document().clone())
                .await?;
            info!(user = %identity, "Restored preferences from local cache");
            self.mirror(&prefs).await;
            return Ok(prefs);
        }

        let prefs = NotificationPreferences::defaults(identity, email, self.ctx.clock().now());
        store
            .set(keys::NOTIFICATION_PREFERENCES, key, prefs.as_document().clone())
            .await?;
        info!(user = %identity, "Created default preferences");
        self.mirror(&prefs).await;
        Ok(prefs)
    }

    /// The stored preference document, if one exists under the canonical key.
    pub async fn load(&self, identity: &UserKey) -> AppResult<Option<NotificationPreferences>> {
        Ok(self
            .ctx
            .store()
            .get(keys::NOTIFICATION_PREFERENCES, identity.as_str())
            .await?
            .map(NotificationPreferences::from_document))
    }

    /// Remote view of one toggle. `Ok(None)` means there is no preference
    /// document at all; a document without the category reads as enabled.
    pub async fn lookup(
        &self,
        identity: &UserKey,
        kind: NotificationType,
    ) -> AppResult<Option<bool>> {
        Ok(self.load(identity).await?.map(|p| p.is_enabled(kind)))
    }

    /// Whether `kind` is enabled for `identity`. Falls back to the local
    /// mirror when the remote side is unreachable, and to enabled when
    /// nothing is known.
    pub async fn get(&self, identity: &UserKey, kind: NotificationType) -> bool {
        match self.lookup(identity, kind).await {
            Ok(Some(enabled)) => return enabled,
            Ok(None) => {}
            Err(e) => warn!(user = %identity, error = %e, "Preference lookup failed, using cache"),
        }
        self.cached(identity, None)
            .await
            .map(|p| p.is_enabled(kind))
            .unwrap_or(true)
    }

    /// Set one toggle with merge semantics, verify it by reading it back,
    /// and mirror the resulting document locally.
    pub async fn set(
        &self,
        identity: Option<&UserKey>,
        kind: NotificationType,
        enabled: bool,
    ) -> Result<NotificationPreferences, PreferenceError> {
        let identity = identity.ok_or(PreferenceError::MissingIdentity)?;
        let store = self.ctx.store();
        let key = identity.as_str();

        if store
            .get(keys::NOTIFICATION_PREFERENCES, key)
            .await?
            .is_none()
        {
            let email = self.ctx.identity().email().await;
            self.initialize(identity, email.as_deref()).await?;
        }

        let mut update = Document::new();
        update.insert(kind.as_str().into(), Value::Bool(enabled));
        update.insert(
            fields::LAST_UPDATED.into(),
            Value::from(self.ctx.clock().now().timestamp_millis()),
        );
        store
            .merge(keys::NOTIFICATION_PREFERENCES, key, update)
            .await?;

        let stored = self.load(identity).await?;
        let actual = stored.as_ref().and_then(|p| p.category(kind));
        if actual != Some(enabled) {
            warn!(user = %identity, category = %kind, expected = enabled, ?actual, "Preference write did not take effect");
            return Err(PreferenceError::VerificationMismatch {
                category: kind,
                expected: enabled,
                actual,
            });
        }

        let stored = stored.unwrap_or_default();
        info!(user = %identity, category = %kind, enabled, "Updated notification preference");
        self.mirror(&stored).await;
        Ok(stored)
    }

    /// The local mirror, if it belongs to `identity` (or `email`).
    async fn cached(&self, identity: &UserKey, email: Option<&str>) -> Option<NotificationPreferences> {
        let cached: NotificationPreferences = read_json(
            self.ctx.local().as_ref(),
            keys::NOTIFICATION_PREFERENCES_CACHE,
        )
        .await?;
        cached.belongs_to(identity, email).then_some(cached)
    }

    async fn mirror(&self, prefs: &NotificationPreferences) {
        if let Err(e) = write_json(
            self.ctx.local().as_ref(),
            keys::NOTIFICATION_PREFERENCES_CACHE,
            prefs,
        )
        .await
        {
            warn!(error = %e, "Failed to mirror preferences locally");
        }
    }
}
