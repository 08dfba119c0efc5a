//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use campus_core::clock::{Clock, ManualClock};
use campus_core::config::AppConfig;
use campus_core::traits::DocumentStore;
use campus_core::types::{Document, Query, StoredDocument};
use campus_service::AppContext;
use campus_store::{MemoryDocumentStore, MemoryLocalStore, keys};

/// Test application context over in-memory stores and a manual clock
pub struct TestApp {
    /// The context every service is built from
    pub ctx: AppContext,
    /// Document store for direct inspection
    pub store: MemoryDocumentStore,
    /// Local store for direct inspection
    pub local: Arc<MemoryLocalStore>,
    /// Clock the test controls
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryDocumentStore::new(256);
        let local = Arc::new(MemoryLocalStore::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let ctx = AppContext::new(
            config,
            Arc::new(store.clone()),
            local.clone(),
            clock.clone(),
        );
        Self {
            ctx,
            store,
            local,
            clock,
        }
    }

    /// A second installation sharing this app's document store and clock
    /// but with its own local store
    pub fn other_installation(&self) -> AppContext {
        AppContext::new(
            self.ctx.config().clone(),
            Arc::new(self.store.clone()),
            Arc::new(MemoryLocalStore::new()),
            self.clock.clone(),
        )
    }

    /// Current test time
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Write a raw document
    pub async fn put(&self, collection: &str, key: &str, value: Value) {
        self.store
            .set(collection, key, object(value))
            .await
            .expect("Failed to write test document");
    }

    /// All notifications in the store
    pub async fn notifications(&self) -> Vec<StoredDocument> {
        self.store
            .query(&Query::collection(keys::NOTIFICATIONS))
            .await
            .expect("Failed to query notifications")
    }

    /// All preference documents in the store
    pub async fn preference_documents(&self) -> Vec<StoredDocument> {
        self.store
            .query(&Query::collection(keys::NOTIFICATION_PREFERENCES))
            .await
            .expect("Failed to query preferences")
    }

    /// Merge fields into a stored notification, bypassing the inbox
    pub async fn store_merge(&self, key: &str, fields: Value) {
        self.store
            .merge(keys::NOTIFICATIONS, key, object(fields))
            .await
            .expect("Failed to merge test document");
    }

    /// Insert a notification with an explicit age and read flag
    pub async fn put_notification(
        &self,
        key: &str,
        recipient: &str,
        read: bool,
        at: DateTime<Utc>,
    ) {
        self.put(
            keys::NOTIFICATIONS,
            key,
            serde_json::json!({
                "recipientId": recipient,
                "recipientIdVerify": recipient,
                "title": key,
                "message": "body",
                "type": "INFO",
                "timestamp": at.timestamp_millis(),
                "read": read,
            }),
        )
        .await;
    }
}

/// Unwrap a JSON object into a document
pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other}"),
    }
}

/// A fixed start time in whole milliseconds, like stored timestamps
pub fn start_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_000_000_000)
        .single()
        .expect("Valid timestamp")
}
