//! # App Error Type
//!
//! Unified error type for every [`PosApp`](crate::PosApp) operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in HM POS                                 │
//! │                                                                         │
//! │  Front end                   Rust                                       │
//! │  ─────────                   ────                                       │
//! │                                                                         │
//! │  app.update_order(id, patch)                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Permission? ─── CoreError::PermissionDenied ───┐                │  │
//! │  │         │                                        │                │  │
//! │  │         ▼                                        ▼                │  │
//! │  │  Transition? ─── CoreError::InvalidTransition ── AppError ──────►│  │
//! │  │         │                                        ▲                │  │
//! │  │         ▼                                        │                │  │
//! │  │  Storage? ────── StoreError::Backend ────────────┘                │  │
//! │  │         │                                                         │  │
//! │  │         ▼                                                         │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  err.to_response()  ─►  { "code": "PERMISSION_DENIED", "message": .. } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use hmpos_core::permissions::Action;
use hmpos_core::{CoreError, ValidationError};
use hmpos_store::StoreError;

/// Result type for app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors returned by the facade.
#[derive(Debug, Error)]
pub enum AppError {
    /// The current user may not perform the action. Nothing was read or written.
    #[error("Permission denied: {action}")]
    PermissionDenied { action: Action },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An order cannot move between the requested states.
    #[error("Order {order_id}: cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: String,
        to: String,
    },

    /// Order or menu item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The key-value store failed.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Store reported unavailable
    /// - Password hashing failed while seeding
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl AppError {
    /// Creates a permission error for an action.
    pub fn denied(action: Action) -> Self {
        AppError::PermissionDenied { action }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Serializable form for the presentation layer.
    ///
    /// Storage failures get a generic message; the detail is in the log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            AppError::Storage(_) => "Could not access saved data".to_string(),
            other => other.to_string(),
        };
        ErrorResponse::new(self.code(), message)
    }
}

/// Error codes handed to the front end.
///
/// ## Usage in Front End
/// ```typescript
/// try {
///   await pos.updateOrder(id, { paymentStatus: 'paid', paymentMethod: 'cash' });
/// } catch (e) {
///   switch (e.code) {
///     case 'PERMISSION_DENIED':
///       Alert.alert(t('noPermission'));
///       break;
///     case 'INVALID_TRANSITION':
///       refreshOrders();
///       break;
///     default:
///       Alert.alert(t('error'), e.message);
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Role does not allow the action
    PermissionDenied,

    /// Input validation failed
    ValidationError,

    /// Order status or payment cannot change as requested
    InvalidTransition,

    /// Order or menu item missing
    NotFound,

    /// Key-value store failure
    StorageError,
}

/// What the front end receives when an operation fails.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 7f3c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        err.to_response()
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PermissionDenied { action } => AppError::PermissionDenied { action },
            CoreError::Validation(e) => AppError::Validation(e),
            CoreError::InvalidTransition { order_id, from, to } => {
                AppError::InvalidTransition { order_id, from, to }
            }
            CoreError::NotFound { entity, id } => AppError::NotFound { entity, id },
        }
    }
}

/// Converts store errors to app errors.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => AppError::NotFound { entity, id },
            other => {
                // Log the actual error; callers only see the generic response
                tracing::error!("Store operation failed: {}", other);
                AppError::Storage(other)
            }
        }
    }
}
