//! Remote document store trait.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::result::AppResult;
use crate::types::document::{Document, Query, StoredDocument};

/// Live query results. Each item is the complete, ordered result set after a
/// change; an `Err` item ends the subscription.
pub type DocumentStream = BoxStream<'static, AppResult<Vec<StoredDocument>>>;

/// A collection-oriented document store with live queries.
///
/// The store offers no cross-document uniqueness constraint and no locking:
/// writes are last-write-wins at the field level when [`merge`] is used.
///
/// [`merge`]: DocumentStore::merge
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read a document by key.
    async fn get(&self, collection: &str, key: &str) -> AppResult<Option<Document>>;

    /// Create or fully replace a document.
    async fn set(&self, collection: &str, key: &str, data: Document) -> AppResult<()>;

    /// Create a document or merge top-level fields into an existing one,
    /// leaving unmentioned fields untouched.
    async fn merge(&self, collection: &str, key: &str, fields: Document) -> AppResult<()>;

    /// Insert a document under a freshly generated key and return the key.
    async fn add(&self, collection: &str, data: Document) -> AppResult<String>;

    /// Delete a document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, key: &str) -> AppResult<bool>;

    /// Run a one-shot query.
    async fn query(&self, query: &Query) -> AppResult<Vec<StoredDocument>>;

    /// Open a live query. The first item is the current result set; later
    /// items follow writes to the collection in write order. Dropping the
    /// stream unsubscribes.
    async fn subscribe(&self, query: Query) -> AppResult<DocumentStream>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
