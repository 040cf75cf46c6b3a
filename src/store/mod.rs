//! Durable key-value store contract.
//!
//! Everything the list layer persists goes through [`KvStore`]: a synchronous
//! string-keyed get/set with no expiry. Backends decide where the strings
//! live; callers own the encoding of values.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;

/// Pluggable string store, scoped to one origin.
///
/// Implementations are `Send + Sync` so a single instance can be shared
/// behind an `Arc` between the list layer and whoever inspects it.
pub trait KvStore: Send + Sync {
    /// Backend name for logs (e.g. `"memory"`, `"file"`).
    fn store_type(&self) -> &str;

    /// Value stored under `key`, or `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Build the backend selected in `config`.
pub fn open(config: &Config) -> Result<Arc<dyn KvStore>, AppError> {
    let store: Arc<dyn KvStore> = match config.storage.backend {
        StorageBackend::File => {
            Arc::new(FileStore::open(&config.work_dir, &config.storage.file_name)?)
        }
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!(backend = store.store_type(), "storage ready");
    Ok(store)
}
