//! # Persistence Collaborator
//!
//! String-keyed storage the session writes after every mutation and reads
//! once at start-up.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Storefront ──► dyn KeyValueStore                             │
//! │                   ├── MemoryStore        (tests, ephemeral)   │
//! │                   └── SessionRepository  (SQLite session_kv)  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use storefront_db::SessionRepository;

use crate::error::StoreError;

/// Key-value storage for persisted session values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads `key`. `Ok(None)` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store.
///
/// Clones share the same entries, so a test can keep a handle and inspect
/// what the session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            entries: Arc::new(Mutex::new(map)),
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every later `set`/`remove` fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Synchronous peek at a stored value.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|map| map.get(key).cloned())
    }

    /// Whether `key` is stored.
    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

// =============================================================================
// SQLite store
// =============================================================================

#[async_trait]
impl KeyValueStore for SessionRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(SessionRepository::get(self, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(SessionRepository::set(self, key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        SessionRepository::remove(self, key).await?;
        Ok(())
    }
}
