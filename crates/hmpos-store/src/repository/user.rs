//! # User Repository
//!
//! Staff accounts under `@hmpos_users`, with argon2 password hashes.
//!
//! ## Login Check
//! ```text
//! email ──► lowercase ──► find account ──► argon2 verify ──► Some(User)
//!                              │                  │
//!                              ▼ none             ▼ mismatch
//!                            None               None
//! ```
//!
//! The hash never leaves this module: callers only ever see [`User`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hmpos_core::{Role, User};

use super::{load_or_default, save};
use crate::error::StoreResult;
use crate::kv::{keys, KeyValueStore};

/// A stored staff account: the public user plus the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(flatten)]
    pub user: User,
    /// argon2 PHC string.
    pub password_hash: String,
}

impl UserAccount {
    /// Creates an account, hashing `password`.
    pub fn new(
        id: impl Into<String>,
        email: &str,
        name: impl Into<String>,
        role: Role,
        password: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Self> {
        Ok(UserAccount {
            user: User {
                id: id.into(),
                email: normalize_email(email),
                name: name.into(),
                role,
                created_at: now,
            },
            password_hash: hash_password(password)?,
        })
    }

    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> StoreResult<String> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        UserRepository { kv }
    }

    pub async fn list(&self) -> StoreResult<Vec<UserAccount>> {
        load_or_default(self.kv.as_ref(), keys::USERS).await
    }

    /// Case-insensitive lookup by email.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        let email = normalize_email(email);
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(&email)))
    }

    /// Returns the user when the credentials match.
    ///
    /// ## Returns
    /// * `Ok(Some(user))` - email known and password correct
    /// * `Ok(None)` - unknown email or wrong password
    /// * `Err(_)` - the store could not be read
    pub async fn authenticate(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let Some(account) = self.find_by_email(email).await? else {
            debug!(email = %email, "Login for unknown email");
            return Ok(None);
        };

        if account.verify(password) {
            Ok(Some(account.user))
        } else {
            debug!(email = %email, "Login with wrong password");
            Ok(None)
        }
    }

    pub async fn save_all(&self, accounts: &[UserAccount]) -> StoreResult<()> {
        save(self.kv.as_ref(), keys::USERS, accounts).await
    }

    /// Writes `accounts` only if no accounts exist. Returns whether it did.
    pub async fn seed_if_empty(&self, accounts: Vec<UserAccount>) -> StoreResult<bool> {
        if !self.list().await?.is_empty() {
            return Ok(false);
        }
        self.save_all(&accounts).await?;
        info!(count = accounts.len(), "Seeded demo accounts");
        Ok(true)
    }
}
