//! # Permissions
//!
//! Role checks for every gated action.
//!
//! ## Role Matrix
//! ```text
//! ┌────────────────────────┬───────┬─────────┬─────────┬────────────┐
//! │ Action                 │ admin │ cashier │ kitchen │ logged out │
//! ├────────────────────────┼───────┼─────────┼─────────┼────────────┤
//! │ add/edit/delete menu   │   ✓   │         │         │            │
//! │ create order           │   ✓   │    ✓    │         │            │
//! │ update order status    │   ✓   │    ✓    │    ✓    │            │
//! │ process payment        │   ✓   │    ✓    │         │            │
//! │ manage settings        │   ✓   │         │         │            │
//! │ view reports           │   ✓   │    ✓    │    ✓    │     ✓      │
//! │ clear all data         │   ✓   │         │         │            │
//! └────────────────────────┴───────┴─────────┴─────────┴────────────┘
//! ```
//!
//! The rules are a closed set with no inheritance. Every function is pure;
//! `PosApp` in hmpos-app is the only place that acts on the answer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

#[inline]
fn has_role(user: Option<&User>, roles: &[Role]) -> bool {
    user.is_some_and(|u| roles.contains(&u.role))
}

/// Role is admin.
pub fn is_admin(user: Option<&User>) -> bool {
    has_role(user, &[Role::Admin])
}

pub fn can_edit_menu(user: Option<&User>) -> bool {
    is_admin(user)
}

pub fn can_delete_menu(user: Option<&User>) -> bool {
    is_admin(user)
}

pub fn can_add_menu_item(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Admin and cashier take orders.
pub fn can_create_order(user: Option<&User>) -> bool {
    has_role(user, &[Role::Admin, Role::Cashier])
}

/// Every staff role moves orders along; the kitchen marks them ready.
pub fn can_update_order_status(user: Option<&User>) -> bool {
    has_role(user, &[Role::Admin, Role::Cashier, Role::Kitchen])
}

/// Admin and cashier record payments.
pub fn can_process_payment(user: Option<&User>) -> bool {
    has_role(user, &[Role::Admin, Role::Cashier])
}

pub fn can_manage_settings(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Reports are open to everyone.
pub fn can_view_reports(_user: Option<&User>) -> bool {
    true
}

// =============================================================================
// Action
// =============================================================================

/// A gated action, named so a denial can say what was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    AddMenuItem,
    EditMenu,
    DeleteMenu,
    CreateOrder,
    UpdateOrderStatus,
    ProcessPayment,
    ManageSettings,
    ViewReports,
    ClearAllData,
}

impl Action {
    /// Evaluates the rule for this action.
    pub fn is_permitted(&self, user: Option<&User>) -> bool {
        match self {
            Action::AddMenuItem => can_add_menu_item(user),
            Action::EditMenu => can_edit_menu(user),
            Action::DeleteMenu => can_delete_menu(user),
            Action::CreateOrder => can_create_order(user),
            Action::UpdateOrderStatus => can_update_order_status(user),
            Action::ProcessPayment => can_process_payment(user),
            Action::ManageSettings => can_manage_settings(user),
            Action::ViewReports => can_view_reports(user),
            Action::ClearAllData => is_admin(user),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::AddMenuItem => "add menu item",
            Action::EditMenu => "edit menu",
            Action::DeleteMenu => "delete menu item",
            Action::CreateOrder => "create order",
            Action::UpdateOrderStatus => "update order status",
            Action::ProcessPayment => "process payment",
            Action::ManageSettings => "manage settings",
            Action::ViewReports => "view reports",
            Action::ClearAllData => "clear all data",
        })
    }
}

/// Returns `PermissionDenied` unless `user` may perform `action`.
///
/// ## Example
/// ```rust
/// use hmpos_core::permissions::{ensure_permitted, Action};
///
/// assert!(ensure_permitted(None, Action::CreateOrder).is_err());
/// assert!(ensure_permitted(None, Action::ViewReports).is_ok());
/// ```
pub fn ensure_permitted(user: Option<&User>, action: Action) -> CoreResult<()> {
    if action.is_permitted(user) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied { action })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
