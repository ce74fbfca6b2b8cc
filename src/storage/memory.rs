use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

use crate::errors::StorageError;

use super::{KeyValueStore, Result};

/// In-process store with an optional byte quota, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total size of keys plus values, like a browser storage quota.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        if let Ok(values) = self.values.get_mut() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// When set, every read fails with [`StorageError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// When set, every write fails with [`StorageError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn used_bytes_without(values: &BTreeMap<String, String>, key: &str) -> usize {
        values
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "reads of `{key}` are disabled"
            )));
        }
        let values = self
            .values
            .read()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "writes to `{key}` are disabled"
            )));
        }
        let mut values = self
            .values
            .write()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        if let Some(quota) = self.quota {
            let bytes = Self::used_bytes_without(&values, key) + key.len() + value.len();
            if bytes > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes,
                    quota,
                });
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        values.remove(key);
        Ok(())
    }
}
