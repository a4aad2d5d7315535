//! # hmpos-store: Key-Value Persistence for HM POS
//!
//! Every collection the app keeps (orders, menu, staff accounts, the
//! current session, settings) lives as one JSON value under one key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PosApp (hmpos-app)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   hmpos-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │    Seed      │  │   │
//! │  │   │  (store.rs)   │    │               │    │  (seed.rs)   │  │   │
//! │  │   │               │    │ OrderRepo     │    │              │  │   │
//! │  │   │ write gates   │◄───│ MenuRepo      │    │ sample menu  │  │   │
//! │  │   │ backend       │    │ UserRepo ...  │    │ demo users   │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────────────────────┐                            │   │
//! │  │   │ dyn KeyValueStore              │                            │   │
//! │  │   │  MemoryStore │ FileStore       │                            │   │
//! │  │   └───────────────────────────────┘                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The store trait, keys and the in-memory backend
//! - [`file`] - JSON-file backend
//! - [`store`] - Store handle and configuration
//! - [`repository`] - One repository per collection
//! - [`seed`] - Sample menu and demo accounts
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hmpos_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::file("./hmpos_data")).await?;
//! let orders = store.orders().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod kv;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use kv::{keys, KeyValueStore, MemoryStore};
pub use seed::{seed_store, SeedReport};
pub use store::{Backend, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::order::OrderRepository;
pub use repository::session::SessionRepository;
pub use repository::settings::SettingsRepository;
pub use repository::user::{UserAccount, UserRepository};
