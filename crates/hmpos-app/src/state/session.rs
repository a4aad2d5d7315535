//! # Session State
//!
//! The signed-in staff member, if any.
//!
//! ## Thread Safety
//! Wrapped in a `tokio::sync::RwLock`. Every gated facade call reads the
//! current user; only login, logout and restore write it.

use tokio::sync::RwLock;

use hmpos_core::User;

#[derive(Debug, Default)]
pub struct SessionState {
    user: RwLock<Option<User>>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    /// A clone of the current user.
    pub async fn current(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn set(&self, user: User) {
        *self.user.write().await = Some(user);
    }

    pub async fn clear(&self) {
        *self.user.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hmpos_core::Role;

    fn kitchen() -> User {
        User {
            id: "kitchen-1".to_string(),
            email: "kitchen@hmpos.com".to_string(),
            name: "Kitchen Staff".to_string(),
            role: Role::Kitchen,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let session = SessionState::new();
        assert!(session.current().await.is_none());

        session.set(kitchen()).await;
        assert_eq!(session.current().await.map(|u| u.role), Some(Role::Kitchen));

        session.clear().await;
        assert!(session.current().await.is_none());
    }
}
