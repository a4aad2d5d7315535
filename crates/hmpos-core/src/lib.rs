//! # hmpos-core: Pure Business Logic for HM POS
//!
//! This crate holds the restaurant order lifecycle, the role-based permission
//! rules and the sales aggregation as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        HM POS Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Mobile Front End (React Native)                    │   │
//! │  │   New Order ──► Kitchen ──► Payment ──► Reports                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  hmpos-app (PosApp facade)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hmpos-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌───────────┐ ┌───────────┐ ┌──────────────────┐  │   │
//! │  │  │  types  │ │permissions│ │ lifecycle │ │   aggregation    │  │   │
//! │  │  │  money  │ │  Action   │ │ OrderPatch│ │ tables, reports  │  │   │
//! │  │  └─────────┘ └───────────┘ └───────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              hmpos-store (key-value persistence)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, MenuItem, Order, AppSettings)
//! - [`money`] - Integer money in minor currency units
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`permissions`] - Role checks for every gated action
//! - [`lifecycle`] - Order creation and status/payment transitions
//! - [`aggregation`] - Table views, kitchen queue, sales reports
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use hmpos_core::lifecycle::{create_order, OrderDraft};
//! use hmpos_core::{Money, OrderStatus};
//!
//! let mut draft = OrderDraft::new("5");
//! draft.add_line("m-1", "Shan Noodles", Money::from_minor(1000), 2);
//! draft.add_line("m-2", "Purified Water", Money::from_minor(500), 1);
//!
//! let order = create_order(draft, "cashier-1", Utc::now(), 0).unwrap();
//! assert_eq!(order.total.minor(), 2500);
//! assert_eq!(order.status, OrderStatus::Pending);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod permissions;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items in a single order.
///
/// ## Business Reason
/// Prevents runaway orders from a stuck "+" button.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price a menu item or order line may carry (Ks).
///
/// ## Business Reason
/// Catches a mistyped price before it reaches an order. With
/// MAX_ORDER_LINES and MAX_ITEM_QUANTITY this also bounds an order total
/// far below `i64::MAX`.
pub const MAX_MENU_PRICE: i64 = 10_000_000;
