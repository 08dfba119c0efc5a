//! # campus-store
//!
//! Storage implementations for Campus Notify:
//!
//! - **document**: an in-process document store with live queries, optionally
//!   snapshotted to a JSON file
//! - **local**: per-installation key/value stores, in memory or file-backed
//!
//! [`keys`] centralises every collection name and local key the engine uses.

pub mod document;
pub mod keys;
pub mod local;

pub use document::MemoryDocumentStore;
pub use local::{FileLocalStore, MemoryLocalStore};
