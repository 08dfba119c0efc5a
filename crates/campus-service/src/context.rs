//! Application context: the explicitly passed owner of stores, clock,
//! configuration, and session state.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use serde_json::{Map, Value};
use tracing::info;

use campus_core::clock::{Clock, SystemClock};
use campus_core::config::AppConfig;
use campus_core::result::AppResult;
use campus_core::traits::{DocumentStore, LocalStore};
use campus_store::MemoryDocumentStore;

use crate::identity::IdentityResolver;
use crate::notification::{Inbox, NotificationEmitter};
use crate::preference::PreferenceStore;

/// The authenticated user held in memory for the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User identifier as the backend returned it (string or number).
    pub id: Value,
    /// User email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Any other profile fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Create a session user from an id and optional email.
    pub fn new(id: impl Into<Value>, email: Option<&str>) -> Self {
        Self {
            id: id.into(),
            email: email.map(str::to_string),
            extra: Map::new(),
        }
    }
}

/// Everything the notification engine needs, built once at startup and
/// passed by reference (or cheap clone) to every service.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    store: Arc<dyn DocumentStore>,
    local: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    session: Arc<RwLock<Option<SessionUser>>>,
    /// Serializes read-modify-write cycles of the local seen set.
    seen: Arc<Mutex<()>>,
}

impl AppContext {
    /// Assemble a context from already constructed parts.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        local: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            local,
            clock,
            session: Arc::new(RwLock::new(None)),
            seen: Arc::new(Mutex::new(())),
        }
    }

    /// Build stores from configuration and use the system clock.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let store = MemoryDocumentStore::open(&config.store).await?;
        let local = campus_store::local::from_config(&config.local).await?;
        info!(
            snapshot = ?config.store.snapshot_path,
            local = ?config.local.path,
            "Application context initialized"
        );
        Ok(Self::new(config, Arc::new(store), local, Arc::new(SystemClock)))
    }

    /// Configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Remote document store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Local key/value store.
    pub fn local(&self) -> &Arc<dyn LocalStore> {
        &self.local
    }

    /// Clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Record the authenticated user for this session.
    pub fn sign_in(&self, user: SessionUser) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *session = Some(user);
    }

    /// Forget the authenticated user.
    pub fn sign_out(&self) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *session = None;
    }

    /// The authenticated user, if any.
    pub fn session_user(&self) -> Option<SessionUser> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Exclusive access to the local seen set. Hold the guard from
    /// [`SeenSet::load`](crate::SeenSet::load) until the updated set is
    /// persisted.
    pub async fn lock_seen(&self) -> MutexGuard<'_, ()> {
        self.seen.lock().await
    }

    /// Identity resolver.
    pub fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.clone())
    }

    /// Preference store accessor.
    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::new(self.clone())
    }

    /// Notification emitter.
    pub fn emitter(&self) -> NotificationEmitter {
        NotificationEmitter::new(self.clone())
    }

    /// Read-state operations.
    pub fn inbox(&self) -> Inbox {
        Inbox::new(self.clone())
    }
}
