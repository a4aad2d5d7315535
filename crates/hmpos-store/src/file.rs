//! # File Store
//!
//! Key-value store backed by one JSON file per key.
//!
//! ## Layout
//! ```text
//! <data dir>/
//! ├── hmpos_menu_items.json
//! ├── hmpos_orders.json
//! ├── hmpos_current_user.json
//! ├── hmpos_settings.json
//! └── hmpos_users.json
//! ```
//!
//! Writes go to `<file>.tmp` first and are renamed over the target, so a
//! crash mid-write leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// JSON-file key-value store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates the store, making the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::backend(&dir.display().to_string(), e))?;

        debug!(dir = %dir.display(), "File store opened");
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `@hmpos_orders` → `<dir>/hmpos_orders.json`.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .trim_start_matches('@')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::backend(key, e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored file is not valid JSON, treating as absent");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(&value).map_err(|e| StoreError::serialization(key, e))?;

        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| StoreError::backend(key, e))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::backend(key, e));
        }

        debug!(key = %key, size = bytes.len(), "Value written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::backend(key, e)),
        }
    }
}
