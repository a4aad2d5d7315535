//! # Session Repository
//!
//! The logged-in user under `@hmpos_current_user`, so a restart keeps the
//! session.

use std::sync::Arc;

use hmpos_core::User;

use super::{load, save};
use crate::error::StoreResult;
use crate::kv::{keys, KeyValueStore};

#[derive(Debug, Clone)]
pub struct SessionRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        SessionRepository { kv }
    }

    /// The persisted user, if any. An unreadable record counts as logged out.
    pub async fn load(&self) -> StoreResult<Option<User>> {
        load(self.kv.as_ref(), keys::CURRENT_USER).await
    }

    pub async fn save(&self, user: &User) -> StoreResult<()> {
        save(self.kv.as_ref(), keys::CURRENT_USER, user).await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.kv.remove(keys::CURRENT_USER).await
    }
}
