//! Per-user notification preferences.

pub mod error;
pub mod store;

pub use error::PreferenceError;
pub use store::PreferenceStore;
