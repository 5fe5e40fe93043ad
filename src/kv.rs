// Key-value store contract

use eyre::{Result, eyre};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key the task list is stored under
pub const STORAGE_KEY: &str = "@tasks_key";

/// Device-local string key-value storage
///
/// Implementations must be `Send` so the background writer can own them.
pub trait KvStore: Send + 'static {
    /// Value stored under `key`, or `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Validate a storage key
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(eyre!("Storage key cannot be empty or whitespace-only"));
    }
    if key.len() > 256 {
        return Err(eyre!("Storage key too long: {} bytes (max 256)", key.len()));
    }
    Ok(())
}

/// In-process store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| eyre!("Memory store lock poisoned"))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
