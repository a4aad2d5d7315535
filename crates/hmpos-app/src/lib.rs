//! # hmpos-app: Application Facade for HM POS
//!
//! What the mobile screens call. Owns the store handle, the signed-in
//! user and in-memory snapshots of the menu, orders and settings.
//!
//! ## Module Organization
//! ```text
//! hmpos_app/
//! ├── lib.rs          ◄── You are here (init_tracing, re-exports)
//! ├── app.rs          ◄── PosApp facade
//! ├── error.rs        ◄── AppError, ErrorCode, ErrorResponse
//! └── state/
//!     ├── config.rs   ◄── AppConfig (HMPOS_* env vars)
//!     ├── session.rs  ◄── SessionState
//!     └── snapshot.rs ◄── SnapshotState
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! hmpos_app::init_tracing();
//! let app = PosApp::open_with_config(AppConfig::from_env()).await?;
//! ```

use tracing_subscriber::EnvFilter;

pub mod app;
pub mod error;
pub mod state;

pub use app::PosApp;
pub use error::{AppError, AppResult, ErrorCode, ErrorResponse};
pub use state::{AppConfig, DEFAULT_DEMO_PASSWORD};

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise `info` everywhere and `debug` for the hmpos crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hmpos=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
