//! # State Module
//!
//! Separate state types owned by [`PosApp`](crate::PosApp) instead of one
//! big struct behind one lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                          PosApp                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┴────────┬──────────────────┐             │
//! │     ▼              ▼                  ▼                  ▼              │
//! │  ┌────────┐  ┌──────────────┐  ┌───────────────┐  ┌──────────────┐     │
//! │  │ Store  │  │ SessionState │  │ SnapshotState │  │  AppConfig   │     │
//! │  │        │  │              │  │               │  │              │     │
//! │  │ repos, │  │ RwLock<      │  │ RwLock<menu>  │  │ store_name   │     │
//! │  │ write  │  │  Option<     │  │ RwLock<orders>│  │ data_dir     │     │
//! │  │ gates  │  │   User>>     │  │ RwLock<       │  │ seed flag    │     │
//! │  │        │  │              │  │   settings>   │  │              │     │
//! │  └────────┘  └──────────────┘  └───────────────┘  └──────────────┘     │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Store: per-collection Mutex write gates                             │
//! │  • SessionState / SnapshotState: tokio RwLock                          │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;
mod snapshot;

pub use config::{AppConfig, DEFAULT_DEMO_PASSWORD};
pub use session::SessionState;
pub use snapshot::SnapshotState;
