//! # Repository Module
//!
//! Typed access to each collection in the key-value store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PosApp                                                                 │
//! │       │  store.orders().update(id, |order| apply_patch(...))           │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── list()                                                             │
//! │  ├── insert_with(build)    ← prepends                                  │
//! │  └── update(id, mutate)                                                 │
//! │       │                                                                 │
//! │       │  whole-collection read → modify → write, behind a write gate   │
//! │       ▼                                                                 │
//! │  KeyValueStore ("@hmpos_orders" → [Order, ...])                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OrderRepository`](order::OrderRepository) - Orders, newest first
//! - [`MenuRepository`](menu::MenuRepository) - Menu items
//! - [`UserRepository`](user::UserRepository) - Staff accounts + password check
//! - [`SessionRepository`](session::SessionRepository) - Persisted current user
//! - [`SettingsRepository`](settings::SettingsRepository) - App settings

pub mod menu;
pub mod order;
pub mod session;
pub mod settings;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::{keys, KeyValueStore};

/// Reads `key`, falling back to `T::default()` when absent or malformed.
pub(crate) async fn load_or_default<T>(kv: &dyn KeyValueStore, key: &str) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    Ok(load(kv, key).await?.unwrap_or_default())
}

/// Reads `key`; a payload of the wrong shape reads as `None`.
///
/// The unreadable payload is copied to [`keys::corrupt_backup`] first, so
/// the next write under `key` does not destroy the only copy.
pub(crate) async fn load<T>(kv: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(value) = kv.get(key).await? else {
        return Ok(None);
    };

    match T::deserialize(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            let backup = keys::corrupt_backup(key);
            if kv.get(&backup).await?.as_ref() != Some(&value) {
                kv.set(&backup, value).await?;
                error!(
                    key = %key,
                    backup = %backup,
                    error = %e,
                    "Stored payload has unexpected shape, kept a copy and using default"
                );
            } else {
                warn!(key = %key, error = %e, "Stored payload still unreadable, using default");
            }
            Ok(None)
        }
    }
}

/// Serializes and writes `value` under `key`.
pub(crate) async fn save<T>(kv: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_value(value).map_err(|e| StoreError::serialization(key, e))?;
    kv.set(key, json).await?;
    debug!(key = %key, "Saved");
    Ok(())
}
