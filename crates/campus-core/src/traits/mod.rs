//! Core traits defined in `campus-core` and implemented by other crates.

pub mod document_store;
pub mod local_store;

pub use document_store::{DocumentStore, DocumentStream};
pub use local_store::LocalStore;
