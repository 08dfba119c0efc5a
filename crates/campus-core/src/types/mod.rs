//! Core type definitions used across the Campus workspace.

pub mod document;
pub mod id;
pub mod sorting;

pub use document::{Document, Filter, Query, StoredDocument};
pub use id::UserKey;
pub use sorting::{SortDirection, SortField};
