//! Scalar key-value persistence, modelled on browser local storage.

pub mod json_backend;
pub mod memory;

use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

pub const EXPENSES_KEY: &str = "expenses";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const CURRENCY_KEY: &str = "currency";
pub const BUDGET_KEY: &str = "budget";

/// Abstraction over backends that persist string values under string keys.
///
/// Every `set` replaces the whole value; partial updates are not supported.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Result of a mutation that has already taken effect in memory.
///
/// `persisted` carries the outcome of the follow-up write; on failure the
/// in-memory state and storage diverge until the next successful write.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub persisted: Result<()>,
}

impl<T> Committed<T> {
    pub fn new(value: T, persisted: Result<()>) -> Self {
        Self { value, persisted }
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn into_parts(self) -> (T, Option<StorageError>) {
        (self.value, self.persisted.err())
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
