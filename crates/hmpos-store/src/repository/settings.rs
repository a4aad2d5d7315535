//! # Settings Repository
//!
//! [`AppSettings`] under `@hmpos_settings`. Missing or unreadable settings
//! load as the defaults.

use std::sync::Arc;

use hmpos_core::AppSettings;

use super::{load_or_default, save};
use crate::error::StoreResult;
use crate::kv::{keys, KeyValueStore};

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        SettingsRepository { kv }
    }

    pub async fn load(&self) -> StoreResult<AppSettings> {
        load_or_default(self.kv.as_ref(), keys::SETTINGS).await
    }

    pub async fn save(&self, settings: &AppSettings) -> StoreResult<()> {
        save(self.kv.as_ref(), keys::SETTINGS, settings).await
    }
}
