//! `file` store: key-value pairs kept in a single JSON file.
//!
//! On-disk shape is a flat object of key → string value:
//!
//! ```json
//! { "filmLists": "{\"watchlist\":[]}" }
//! ```
//!
//! Every `set` rewrites the whole file. A missing file reads as an empty
//! store; the file is created on first write. A file that is not a JSON
//! object fails every `get`, and the next `set` replaces it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::AppError;
use super::KvStore;

/// Default file name inside the work directory.
pub const DEFAULT_FILE_NAME: &str = "local_storage.json";

pub struct FileStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (without creating) the store file `file_name` inside `dir`.
    /// `dir` is created if it does not exist yet.
    pub fn open(dir: &Path, file_name: &str) -> Result<Self, AppError> {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        let path = dir.join(file_name);
        debug!(path = %path.display(), "file store opened");
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File contents, or `None` when there is nothing to parse.
    fn read_raw(&self) -> Result<Option<String>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(format!("cannot read {}: {e}", self.path.display())))?;
        Ok(Some(data).filter(|d| !d.trim().is_empty()))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        match self.read_raw()? {
            None => Ok(BTreeMap::new()),
            Some(data) => serde_json::from_str(&data)
                .map_err(|e| AppError::Storage(format!("malformed {}: {e}", self.path.display()))),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("serialise store: {e}")))?;
        fs::write(&self.path, data)
            .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", self.path.display())))
    }
}

impl KvStore for FileStore {
    fn store_type(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::Storage("file store lock poisoned".into()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::Storage("file store lock poisoned".into()))?;
        let mut entries = match self.read_raw()? {
            None => BTreeMap::new(),
            Some(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "replacing malformed store file");
                BTreeMap::new()
            }),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}
