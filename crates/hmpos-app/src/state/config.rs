//! # Configuration State
//!
//! Process-level configuration loaded at startup. Runtime preferences
//! (language, tax rate, ...) are the persisted `AppSettings`, not this.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`HMPOS_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Read-only after startup, so no lock.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use hmpos_store::StoreConfig;

/// Password the demo accounts are seeded with when none is configured.
pub const DEFAULT_DEMO_PASSWORD: &str = "hmpos123";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Shown in the header and on receipts.
    pub store_name: String,

    /// Where the file store lives. `None` resolves to the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,

    /// Password for the seeded demo accounts.
    pub demo_password: String,

    /// Seed the sample menu and demo accounts into an empty store.
    pub seed_on_empty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: "HM POS".to_string(),
            data_dir: None,
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
            seed_on_empty: true,
        }
    }
}

impl AppConfig {
    /// Creates an AppConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `HMPOS_STORE_NAME`: Override store name
    /// - `HMPOS_DATA_DIR`: Data directory for the file store
    /// - `HMPOS_DEMO_PASSWORD`: Demo account password
    /// - `HMPOS_SEED`: `false`/`0`/`no`/`off` disables seeding
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(store_name) = lookup("HMPOS_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(dir) = lookup("HMPOS_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(password) = lookup("HMPOS_DEMO_PASSWORD") {
            config.demo_password = password;
        }

        if let Some(flag) = lookup("HMPOS_SEED") {
            match parse_flag(&flag) {
                Some(seed) => config.seed_on_empty = seed,
                None => warn!(value = %flag, "Ignoring unrecognised HMPOS_SEED"),
            }
        }

        config
    }

    /// The data directory to use.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.hmpos.pos`
    /// - **Windows**: `%APPDATA%\hmpos\pos\data`
    /// - **Linux**: `~/.local/share/pos`
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Some(dir.clone());
        }
        ProjectDirs::from("com", "hmpos", "pos").map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// File store at the resolved data directory. Falls back to an
    /// in-memory store when the platform has no home directory.
    pub fn store_config(&self) -> StoreConfig {
        match self.resolve_data_dir() {
            Some(dir) => StoreConfig::file(dir),
            None => {
                warn!("Could not determine app data directory, data will not persist");
                StoreConfig::in_memory()
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.demo_password, DEFAULT_DEMO_PASSWORD);
        assert!(config.seed_on_empty);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HMPOS_STORE_NAME", "Mya Mya Kitchen"),
            ("HMPOS_DATA_DIR", "/tmp/hmpos"),
            ("HMPOS_DEMO_PASSWORD", "letmein"),
            ("HMPOS_SEED", "off"),
        ]));
        assert_eq!(config.store_name, "Mya Mya Kitchen");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/hmpos")));
        assert_eq!(config.demo_password, "letmein");
        assert!(!config.seed_on_empty);
        assert_eq!(config.store_config(), StoreConfig::file("/tmp/hmpos"));
    }

    #[test]
    fn test_bad_seed_flag_keeps_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("HMPOS_SEED", "maybe"), ("HMPOS_DATA_DIR", "  ")]));
        assert!(config.seed_on_empty);
        assert_eq!(config.data_dir, None);
    }
}
