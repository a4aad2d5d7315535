//! # Key-Value Store
//!
//! The seam between HM POS and whatever holds its bytes on the device.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(key)            → Option<JSON>   (None when never written)        │
//! │  set(key, JSON)      → ()             (replaces the whole value)       │
//! │  remove(key)         → ()             (no-op when absent)              │
//! │  multi_remove(keys)  → ()                                               │
//! │                                                                         │
//! │  Values are whole collections: one key holds every order, another     │
//! │  every menu item. There is no partial write and no cross-key atomicity.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};

/// Storage keys, namespaced like the mobile app's originals.
pub mod keys {
    pub const MENU_ITEMS: &str = "@hmpos_menu_items";
    pub const ORDERS: &str = "@hmpos_orders";
    pub const CURRENT_USER: &str = "@hmpos_current_user";
    pub const SETTINGS: &str = "@hmpos_settings";
    pub const USERS: &str = "@hmpos_users";

    /// Every key the app writes.
    pub const ALL: [&str; 5] = [MENU_ITEMS, ORDERS, CURRENT_USER, SETTINGS, USERS];

    /// Where an unreadable payload under `key` is kept before it reads as empty.
    pub fn corrupt_backup(key: &str) -> String {
        format!("{}.corrupt", key)
    }
}

/// A string-keyed store of JSON values.
#[async_trait]
pub trait KeyValueStore: Debug + Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Removes several keys, stopping at the first failure.
    async fn multi_remove(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Process-local store for tests and throwaway sessions.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.set("k", json!([1, 2])).await?;
/// assert_eq!(store.get("k").await?, Some(json!([1, 2])));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every subsequent call fail with `StoreError::Backend`.
    ///
    /// Lets tests exercise the "store unavailable" paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::backend(key, "store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        self.check(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.check(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}
