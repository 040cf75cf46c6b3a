//! `memory` store: ephemeral in-process key-value store.
//!
//! Data is discarded when the process exits. Used by tests and by the
//! `backend = "memory"` config option for throwaway sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppError;
use super::KvStore;

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let data = self
            .data
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
