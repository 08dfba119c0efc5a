//! Local key/value store implementations.

pub mod file;
pub mod memory;

pub use file::FileLocalStore;
pub use memory::MemoryLocalStore;

use std::sync::Arc;

use campus_core::config::LocalStoreConfig;
use campus_core::result::AppResult;
use campus_core::traits::LocalStore;

/// Build the local store selected by configuration.
pub async fn from_config(config: &LocalStoreConfig) -> AppResult<Arc<dyn LocalStore>> {
    match &config.path {
        Some(path) => Ok(Arc::new(FileLocalStore::open(path).await?)),
        None => Ok(Arc::new(MemoryLocalStore::new())),
    }
}
