//! # Store Handle
//!
//! Opens a backend and hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StoreConfig::file(dir) / StoreConfig::in_memory()                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config).await                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────┐                     │
//! │  │ Store                                          │                     │
//! │  │   kv:         Arc<dyn KeyValueStore>           │                     │
//! │  │   order_gate: Arc<Mutex<()>>  ─► orders()      │                     │
//! │  │   menu_gate:  Arc<Mutex<()>>  ─► menu()        │                     │
//! │  │                                ─► users()      │                     │
//! │  │                                ─► session()    │                     │
//! │  │                                ─► settings()   │                     │
//! │  └───────────────────────────────────────────────┘                     │
//! │                                                                         │
//! │  Cloning a Store clones the Arcs: every clone shares the same gates.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::error::StoreResult;
use crate::file::FileStore;
use crate::kv::{keys, KeyValueStore, MemoryStore};
use crate::repository::menu::MenuRepository;
use crate::repository::order::OrderRepository;
use crate::repository::session::SessionRepository;
use crate::repository::settings::SettingsRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Which backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Lost when the process exits.
    Memory,
    /// One JSON file per key under this directory.
    File(PathBuf),
}

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let store = Store::open(StoreConfig::file("./data")).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: Backend,
}

impl StoreConfig {
    /// File-backed store rooted at `dir`.
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            backend: Backend::File(dir.into()),
        }
    }

    /// Creates an in-memory store configuration (for testing).
    pub fn in_memory() -> Self {
        StoreConfig {
            backend: Backend::Memory,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
#[derive(Debug, Clone)]
pub struct Store {
    kv: Arc<dyn KeyValueStore>,
    order_gate: Arc<Mutex<()>>,
    menu_gate: Arc<Mutex<()>>,
}

impl Store {
    /// Opens the configured backend.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let kv: Arc<dyn KeyValueStore> = match config.backend {
            Backend::Memory => {
                info!("Opening in-memory store");
                Arc::new(MemoryStore::new())
            }
            Backend::File(dir) => {
                info!(dir = %dir.display(), "Opening file store");
                Arc::new(FileStore::open(dir).await?)
            }
        };
        Ok(Store::with_backend(kv))
    }

    /// Wraps an already-built backend.
    pub fn with_backend(kv: Arc<dyn KeyValueStore>) -> Self {
        Store {
            kv,
            order_gate: Arc::new(Mutex::new(())),
            menu_gate: Arc::new(Mutex::new(())),
        }
    }

    /// The raw backend, for callers that need a key the repositories don't cover.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.kv.clone(), self.order_gate.clone())
    }

    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.kv.clone(), self.menu_gate.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.kv.clone())
    }

    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.kv.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.kv.clone())
    }

    /// Removes every key the app writes.
    ///
    /// Holds both write gates so no order or menu write interleaves.
    pub async fn clear_all(&self) -> StoreResult<()> {
        let _orders = self.order_gate.lock().await;
        let _menu = self.menu_gate.lock().await;
        self.kv.multi_remove(&keys::ALL).await?;
        let backups: Vec<String> = keys::ALL.iter().map(|key| keys::corrupt_backup(key)).collect();
        let backups: Vec<&str> = backups.iter().map(String::as_str).collect();
        self.kv.multi_remove(&backups).await?;
        info!("All stored data cleared");
        Ok(())
    }
}
