//! # Store Error Types
//!
//! Error types for key-value store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure (std::io::Error, poisoned state, ...)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the key and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in hmpos-app) ← Serialized for the front end                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Front end shows "could not save"                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A payload that parses but has the wrong shape is NOT an error: the
//! repositories log it and fall back to the default collection.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected a read or write.
    ///
    /// ## When This Occurs
    /// - Data directory missing and not creatable
    /// - Disk full, permissions
    /// - Store marked unavailable in tests
    #[error("Storage backend failed for '{key}': {message}")]
    Backend { key: String, message: String },

    /// A value could not be turned into JSON.
    ///
    /// ## When This Occurs
    /// Serializing a collection before a write. Reads never produce this;
    /// unreadable payloads are treated as absent.
    #[error("Serialization failed for '{key}': {message}")]
    Serialization { key: String, message: String },

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Entity not found in its collection.
    ///
    /// ## When This Occurs
    /// - Updating or deleting an order/menu item by an unknown id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Backend error for a key.
    pub fn backend(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn serialization(key: &str, err: serde_json::Error) -> Self {
        StoreError::Serialization {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(err: argon2::password_hash::Error) -> Self {
        StoreError::Hashing(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Order", "o-9");
        assert_eq!(err.to_string(), "Order not found: o-9");

        let err = StoreError::backend("@hmpos_orders", "disk full");
        assert_eq!(
            err.to_string(),
            "Storage backend failed for '@hmpos_orders': disk full"
        );
    }
}
