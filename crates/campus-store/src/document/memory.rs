//! In-process document store with live queries.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};
use uuid::Uuid;

use campus_core::config::StoreConfig;
use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::traits::document_store::{DocumentStore, DocumentStream};
use campus_core::types::{Document, Query, StoredDocument};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store kept in memory, optionally mirrored to a JSON snapshot
/// file after every write.
///
/// Writes to a collection are announced on a broadcast channel; each live
/// query re-runs itself when its collection changes.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Collection name → key → document
    collections: RwLock<Collections>,
    /// Names of collections that were just written
    changes: broadcast::Sender<String>,
    /// Snapshot file, if persistence is enabled
    snapshot_path: Option<PathBuf>,
}

impl MemoryDocumentStore {
    /// Create an empty, purely in-memory store.
    pub fn new(change_buffer: usize) -> Self {
        Self::with_state(Collections::new(), change_buffer, None)
    }

    /// Open a store from configuration, loading the snapshot file if one is
    /// configured and present.
    pub async fn open(config: &StoreConfig) -> AppResult<Self> {
        let Some(path) = config.snapshot_path.as_ref().map(PathBuf::from) else {
            return Ok(Self::new(config.change_buffer));
        };

        let collections = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::with_source(
                    campus_core::error::ErrorKind::DataShape,
                    format!("Corrupt document snapshot {}", path.display()),
                    e,
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            collections = collections.len(),
            "Opened document store snapshot"
        );
        Ok(Self::with_state(collections, config.change_buffer, Some(path)))
    }

    fn with_state(collections: Collections, change_buffer: usize, snapshot_path: Option<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(change_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(collections),
                changes,
                snapshot_path,
            }),
        }
    }

    /// Apply a mutation to one collection, persist, and announce the change.
    async fn write<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut BTreeMap<String, Document>) -> R,
    ) -> AppResult<R> {
        let mut guard = self.inner.collections.write().await;
        let result = f(guard.entry(collection.to_string()).or_default());

        if let Some(path) = &self.inner.snapshot_path {
            let json = serde_json::to_string(&*guard)?;
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            tokio::fs::write(path, json).await?;
        }
        drop(guard);

        // No receivers is fine: nobody is subscribed.
        let _ = self.inner.changes.send(collection.to_string());
        Ok(result)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> AppResult<Option<Document>> {
        let guard = self.inner.collections.read().await;
        Ok(guard.get(collection).and_then(|c| c.get(key)).cloned())
    }

    async fn set(&self, collection: &str, key: &str, data: Document) -> AppResult<()> {
        self.write(collection, |docs| {
            docs.insert(key.to_string(), data);
        })
        .await
    }

    async fn merge(&self, collection: &str, key: &str, fields: Document) -> AppResult<()> {
        self.write(collection, |docs| {
            let doc = docs.entry(key.to_string()).or_default();
            for (field, value) in fields {
                doc.insert(field, value);
            }
        })
        .await
    }

    async fn add(&self, collection: &str, data: Document) -> AppResult<String> {
        let key = Uuid::new_v4().simple().to_string();
        let inserted = key.clone();
        self.write(collection, move |docs| {
            docs.insert(inserted, data);
        })
        .await?;
        Ok(key)
    }

    async fn delete(&self, collection: &str, key: &str) -> AppResult<bool> {
        self.write(collection, |docs| docs.remove(key).is_some()).await
    }

    async fn query(&self, query: &Query) -> AppResult<Vec<StoredDocument>> {
        let guard = self.inner.collections.read().await;
        let Some(docs) = guard.get(&query.collection) else {
            return Ok(Vec::new());
        };
        Ok(query.apply(
            docs.iter()
                .map(|(key, data)| StoredDocument::new(key.clone(), data.clone())),
        ))
    }

    async fn subscribe(&self, query: Query) -> AppResult<DocumentStream> {
        // Subscribe before the first read so no write falls in between.
        let rx = self.inner.changes.subscribe();
        let initial = self.query(&query).await?;
        let store = self.clone();

        let stream = futures::stream::unfold(
            LiveQuery {
                store,
                query,
                rx,
                pending: Some(initial),
                last: None,
                done: false,
            },
            |mut live| async move {
                if live.done {
                    return None;
                }
                if let Some(batch) = live.pending.take() {
                    live.last = Some(batch.clone());
                    return Some((Ok(batch), live));
                }
                loop {
                    match live.rx.recv().await {
                        Ok(collection) if collection == live.query.collection => {}
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // A fresh query covers whatever was skipped.
                            debug!(skipped, collection = %live.query.collection, "Live query lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                    match live.store.query(&live.query).await {
                        // Writes that leave the result set unchanged are not reported.
                        Ok(batch) if live.last.as_ref() == Some(&batch) => continue,
                        Ok(batch) => {
                            live.last = Some(batch.clone());
                            return Some((Ok(batch), live));
                        }
                        Err(e) => {
                            live.done = true;
                            return Some((Err(e), live));
                        }
                    }
                }
            },
        );

        Ok(stream.boxed())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// State carried between items of a live query stream.
struct LiveQuery {
    store: MemoryDocumentStore,
    query: Query,
    rx: broadcast::Receiver<String>,
    pending: Option<Vec<StoredDocument>>,
    last: Option<Vec<StoredDocument>>,
    done: bool,
}
