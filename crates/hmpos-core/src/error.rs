//! # Error Types
//!
//! Domain-specific error types for hmpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hmpos-core errors (this file)                                         │
//! │  ├── CoreError        - Permission, transition, lookup failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  hmpos-store errors (separate crate)                                   │
//! │  └── StoreError       - Key-value store failures                       │
//! │                                                                         │
//! │  hmpos-app errors                                                      │
//! │  └── AppError         - What the front end sees (with ErrorCode)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Front end              │
//! │                          StoreError ──┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::permissions::Action;
use crate::types::{OrderStatus, PaymentStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The current user's role does not allow the action.
    ///
    /// ## When This Occurs
    /// - Kitchen staff trying to record a payment
    /// - Cashier trying to edit the menu
    /// - Any gated action while logged out
    #[error("Permission denied: {action}")]
    PermissionDenied { action: Action },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An order cannot move from its current state to the requested one.
    ///
    /// ## When This Occurs
    /// ```text
    /// completed ──► preparing     (backward)
    /// pending   ──► ready         (skips preparing)
    /// cancelled ──► anything      (terminal)
    /// unpaid    ──► refunded      (never paid)
    /// ```
    #[error("Order {order_id}: cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: String,
        to: String,
    },

    /// Referenced order or menu item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub(crate) fn status_transition(order_id: &str, from: OrderStatus, to: OrderStatus) -> Self {
        CoreError::InvalidTransition {
            order_id: order_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub(crate) fn payment_transition(
        order_id: &str,
        from: PaymentStatus,
        to: impl Into<String>,
    ) -> Self {
        CoreError::InvalidTransition {
            order_id: order_id.to_string(),
            from: from.to_string(),
            to: to.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Referenced item cannot be ordered right now.
    #[error("{name} is not available")]
    Unavailable { name: String },

    /// An update carried no fields.
    #[error("{entity} update is empty")]
    EmptyUpdate { entity: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::status_transition("o-1", OrderStatus::Completed, OrderStatus::Preparing);
        assert_eq!(
            err.to_string(),
            "Order o-1: cannot move from completed to preparing"
        );

        let err = CoreError::PermissionDenied {
            action: Action::ProcessPayment,
        };
        assert_eq!(err.to_string(), "Permission denied: process payment");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("table number");
        assert_eq!(err.to_string(), "table number is required");

        let err = ValidationError::EmptyUpdate {
            entity: "order".to_string(),
        };
        assert_eq!(err.to_string(), "order update is empty");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("items").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
