//! # Order Lifecycle
//!
//! Order submission and the status/payment state machines.
//!
//! ## Status Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──► preparing ──► ready ──► completed                        │
//! │      │            │                                                     │
//! │      └────────────┴──────────────────► cancelled                       │
//! │                                                                         │
//! │   completed, cancelled: terminal                                       │
//! │                                                                         │
//! │   Payment (independent of status):                                     │
//! │   unpaid ──(method)──► paid ──► refunded                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every patch is validated as a whole before any field changes, so a
//! rejected patch leaves the order untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::permissions::Action;
use crate::types::{MenuItem, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
use crate::validation::{validate_order_items, validate_quantity, validate_table_number};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Order Draft
// =============================================================================

/// An order being composed on the new-order screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub table_number: String,
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    /// Starts an empty draft for a table.
    pub fn new(table_number: impl Into<String>) -> Self {
        OrderDraft {
            table_number: table_number.into(),
            items: Vec::new(),
        }
    }

    /// Builds a draft from menu items and quantities in one go.
    pub fn from_menu<'a>(
        table_number: impl Into<String>,
        lines: impl IntoIterator<Item = (&'a MenuItem, i64)>,
    ) -> Result<Self, ValidationError> {
        let mut draft = OrderDraft::new(table_number);
        for (menu_item, quantity) in lines {
            draft.add_menu_item(menu_item, quantity)?;
        }
        Ok(draft)
    }

    /// Adds portions of a menu item, merging with an existing line.
    ///
    /// ## Errors
    /// - `Unavailable` if the kitchen has switched the item off
    /// - `OutOfRange` if the merged quantity would exceed 999
    pub fn add_menu_item(&mut self, menu_item: &MenuItem, quantity: i64) -> Result<(), ValidationError> {
        if !menu_item.available {
            return Err(ValidationError::Unavailable {
                name: menu_item.name.clone(),
            });
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.menu_item_id == menu_item.id) {
            let merged = line.quantity.checked_add(quantity).ok_or(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_ITEM_QUANTITY,
            })?;
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        validate_quantity(quantity)?;
        self.items.push(OrderItem::from_menu_item(menu_item, quantity));
        Ok(())
    }

    /// Adds a line from raw parts, snapshotting a minimal menu item.
    ///
    /// Handy for tests and for re-submitting orders exported elsewhere.
    pub fn add_line(
        &mut self,
        menu_item_id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
    ) {
        let name = name.into();
        let menu_item = MenuItem {
            id: menu_item_id.into(),
            name: name.clone(),
            name_mm: None,
            price,
            category: String::new(),
            available: true,
            created_at: None,
            updated_at: None,
        };
        self.items.push(OrderItem {
            menu_item_id: menu_item.id.clone(),
            menu_item,
            name,
            quantity,
            price,
        });
    }

    /// Changes a line's quantity by `delta`; lines reaching zero are removed.
    pub fn adjust_quantity(&mut self, menu_item_id: &str, delta: i64) {
        for line in self.items.iter_mut().filter(|l| l.menu_item_id == menu_item_id) {
            line.quantity = line.quantity.saturating_add(delta);
        }
        self.items.retain(|l| l.quantity > 0);
    }

    /// Running total shown under the basket.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

// =============================================================================
// Order Creation
// =============================================================================

/// Builds a new order from a draft.
///
/// ## Arguments
/// * `draft` - table number and line items
/// * `created_by` - id of the user submitting the order
/// * `now` - creation timestamp
/// * `orders_today` - how many orders already exist for `now`'s day; used
///   for the order number
///
/// ## Returns
/// A `pending`, `unpaid` order whose total is the exact sum of line totals.
pub fn create_order(
    draft: OrderDraft,
    created_by: &str,
    now: DateTime<Utc>,
    orders_today: usize,
) -> CoreResult<Order> {
    let table_number = validate_table_number(&draft.table_number)?;
    validate_order_items(&draft.items)?;

    let total = draft.total();

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        order_number: Some(order_number(now, orders_today + 1)),
        table_number,
        items: draft.items,
        total,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_method: None,
        created_by: created_by.to_string(),
        created_at: now,
        updated_at: None,
    })
}

/// How many of `orders` were created on `now`'s UTC calendar day.
pub fn orders_created_on(orders: &[Order], now: DateTime<Utc>) -> usize {
    let day = now.date_naive();
    orders.iter().filter(|o| o.created_at.date_naive() == day).count()
}

/// Formats an order number: `YYYYMMDD-NNNN`.
///
/// ## Example
/// `20250314-0007`
pub fn order_number(now: DateTime<Utc>, sequence: usize) -> String {
    format!("{}-{:04}", now.format("%Y%m%d"), sequence)
}

// =============================================================================
// Transitions
// =============================================================================

/// Whether `to` directly follows `from` in the status graph.
pub const fn is_valid_status_transition(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Pending, OrderStatus::Preparing)
            | (OrderStatus::Preparing, OrderStatus::Ready)
            | (OrderStatus::Ready, OrderStatus::Completed)
            | (OrderStatus::Pending, OrderStatus::Cancelled)
            | (OrderStatus::Preparing, OrderStatus::Cancelled)
    )
}

/// The status the kitchen screen's main button moves an order to.
pub const fn next_status(current: OrderStatus) -> Option<OrderStatus> {
    match current {
        OrderStatus::Pending => Some(OrderStatus::Preparing),
        OrderStatus::Preparing => Some(OrderStatus::Ready),
        OrderStatus::Ready => Some(OrderStatus::Completed),
        OrderStatus::Completed | OrderStatus::Cancelled => None,
    }
}

/// A change to an existing order.
///
/// Status and payment fields may be combined; each half is checked against
/// its own state machine and its own permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl OrderPatch {
    /// Moves the order to `status`.
    pub fn status(status: OrderStatus) -> Self {
        OrderPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Marks the order paid with `method`.
    pub fn pay(method: PaymentMethod) -> Self {
        OrderPatch {
            payment_status: Some(PaymentStatus::Paid),
            payment_method: Some(method),
            ..Default::default()
        }
    }

    /// Marks a paid order refunded.
    pub fn refund() -> Self {
        OrderPatch {
            payment_status: Some(PaymentStatus::Refunded),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && !self.touches_payment()
    }

    pub fn touches_status(&self) -> bool {
        self.status.is_some()
    }

    pub fn touches_payment(&self) -> bool {
        self.payment_status.is_some() || self.payment_method.is_some()
    }

    /// The permissions this patch needs, in the order they are checked.
    pub fn required_actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if self.touches_status() {
            actions.push(Action::UpdateOrderStatus);
        }
        if self.touches_payment() {
            actions.push(Action::ProcessPayment);
        }
        actions
    }
}

/// Checks a patch against the order's current state without changing it.
pub fn validate_patch(order: &Order, patch: &OrderPatch) -> CoreResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate {
            entity: "order".to_string(),
        }
        .into());
    }

    if let Some(to) = patch.status {
        if !is_valid_status_transition(order.status, to) {
            return Err(CoreError::status_transition(&order.id, order.status, to));
        }
    }

    if patch.touches_payment() {
        validate_payment_change(order, patch)?;
    }

    Ok(())
}

fn validate_payment_change(order: &Order, patch: &OrderPatch) -> CoreResult<()> {
    let from = order.payment_status;

    match (patch.payment_status, patch.payment_method) {
        // unpaid → paid needs the method in the same patch
        (Some(PaymentStatus::Paid), Some(_)) if from == PaymentStatus::Unpaid => Ok(()),
        (Some(PaymentStatus::Paid), None) => Err(CoreError::payment_transition(
            &order.id,
            from,
            "paid without a payment method",
        )),
        (Some(PaymentStatus::Refunded), None) if from == PaymentStatus::Paid => Ok(()),
        (None, Some(method)) => Err(CoreError::payment_transition(
            &order.id,
            from,
            format!("payment method {} without paid status", method),
        )),
        (Some(to), Some(method)) if to != PaymentStatus::Paid => Err(CoreError::payment_transition(
            &order.id,
            from,
            format!("{} with payment method {}", to, method),
        )),
        (Some(to), _) => Err(CoreError::payment_transition(&order.id, from, to.to_string())),
        (None, None) => Ok(()),
    }
}

/// Validates and applies a patch, stamping `updated_at`.
///
/// Only `status`, `payment_status`, `payment_method` and `updated_at` can
/// change; `total` and `items` are never touched.
pub fn apply_patch(order: &mut Order, patch: &OrderPatch, now: DateTime<Utc>) -> CoreResult<()> {
    validate_patch(order, patch)?;

    if let Some(status) = patch.status {
        order.status = status;
    }
    if let Some(payment_status) = patch.payment_status {
        order.payment_status = payment_status;
    }
    if let Some(method) = patch.payment_method {
        order.payment_method = Some(method);
    }
    order.updated_at = Some(now);

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
