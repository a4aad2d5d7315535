//! # Domain Types
//!
//! Core domain types used throughout HM POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    MenuItem     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, email      │   │  id, name       │   │  id, table      │       │
//! │  │  name           │   │  nameMM         │   │  items[]        │       │
//! │  │  role           │   │  price, category│   │  total          │       │
//! │  └─────────────────┘   │  available      │   │  status         │       │
//! │                        └────────┬────────┘   │  paymentStatus  │       │
//! │                                 │ snapshot   │  paymentMethod  │       │
//! │                                 ▼            └────────┬────────┘       │
//! │                        ┌─────────────────┐            │                 │
//! │                        │   OrderItem     │◄───────────┘                 │
//! │                        │  menuItem copy  │                              │
//! │                        │  quantity, price│                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every persisted type serializes as camelCase JSON so payloads written by
//! earlier builds of the mobile app still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 500 bps = 5% (Myanmar commercial tax).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Language
// =============================================================================

/// UI language. Role names and receipts follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    /// Myanmar.
    Mm,
}

// =============================================================================
// User
// =============================================================================

/// Staff role. The permission rules in [`crate::permissions`] key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Cashier,
    Kitchen,
}

impl Role {
    /// Human-readable role name for the profile screen.
    pub fn display_name(&self, language: Language) -> &'static str {
        match (self, language) {
            (Role::Admin, Language::En) => "Administrator",
            (Role::Cashier, Language::En) => "Cashier",
            (Role::Kitchen, Language::En) => "Kitchen Staff",
            (Role::Admin, Language::Mm) => "စီမံခန့်ခွဲသူ",
            (Role::Cashier, Language::Mm) => "ငွေကိုင်",
            (Role::Kitchen, Language::Mm) => "မီးဖိုမှူး",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Kitchen => "kitchen",
        })
    }
}

/// A staff member. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on the menu.
///
/// ## Invariants
/// - `price > 0`
/// - `name` and `category` non-empty
/// - `category` stored lowercase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    /// Myanmar-language name.
    #[serde(rename = "nameMM", default, skip_serializing_if = "Option::is_none")]
    pub name_mm: Option<String>,

    pub price: Money,

    pub category: String,

    /// Whether the kitchen can currently make it.
    pub available: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// Creates an available menu item with a fresh id.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        MenuItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into().trim().to_string(),
            name_mm: None,
            price,
            category: normalize_category(&category.into()),
            available: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Sets the Myanmar-language name.
    pub fn with_name_mm(mut self, name_mm: impl Into<String>) -> Self {
        self.name_mm = Some(name_mm.into());
        self
    }

    /// Returns the item with name trimmed and category lowercased.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = normalize_category(&self.category);
        self
    }

    /// Applies a partial update and stamps `updated_at`.
    ///
    /// Validation happens before this is called.
    pub fn apply_update(&mut self, update: &MenuItemUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(name_mm) = &update.name_mm {
            self.name_mm = Some(name_mm.clone());
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = &update.category {
            self.category = normalize_category(category);
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        self.updated_at = Some(now);
    }
}

/// Lowercases and trims a free-text category.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Partial update for a menu item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "nameMM", default)]
    pub name_mm: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl MenuItemUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.name_mm.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.available.is_none()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in the kitchen flow.
///
/// ```text
/// pending ──► preparing ──► ready ──► completed
///    │            │
///    └────────────┴──────► cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, not yet picked up by the kitchen.
    #[default]
    Pending,
    Preparing,
    /// Cooked, waiting to be served.
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Completed and cancelled orders accept no further status change.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses that raise the "pending orders" alert.
    pub const fn needs_attention(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        })
    }
}

// =============================================================================
// Payment Status & Method
// =============================================================================

/// Whether an order has been paid for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Older payloads wrote `"pending"` for unpaid orders.
    #[default]
    #[serde(alias = "pending")]
    Unpaid,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        })
    }
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// KBZ Pay mobile wallet (QR).
    Kbzpay,
    /// Wave Pay mobile wallet (QR).
    Wavepay,
}

impl PaymentMethod {
    /// Label shown on the payment screen and receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Kbzpay => "KBZ Pay",
            PaymentMethod::Wavepay => "Wave Pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Kbzpay => "kbzpay",
            PaymentMethod::Wavepay => "wavepay",
        })
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
///
/// Uses the snapshot pattern: `menu_item`, `name` and `price` are copied at
/// order time so later menu edits don't rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: String,
    /// Menu item as it was when the order was placed (frozen).
    pub menu_item: MenuItem,
    /// Name at time of order (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price at time of order (frozen).
    pub price: Money,
}

impl OrderItem {
    /// Snapshots a menu item into a line item.
    pub fn from_menu_item(menu_item: &MenuItem, quantity: i64) -> Self {
        OrderItem {
            menu_item_id: menu_item.id.clone(),
            menu_item: menu_item.clone(),
            name: menu_item.name.clone(),
            quantity,
            price: menu_item.price,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A table's order.
///
/// Orders are never deleted; completed and cancelled orders stay for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,

    /// Human-facing number, `YYYYMMDD-NNNN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    pub table_number: String,

    pub items: Vec<OrderItem>,

    /// Sum of line totals at submission. Never recomputed by patches.
    pub total: Money,

    pub status: OrderStatus,

    pub payment_status: PaymentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    /// Id of the user who took the order.
    pub created_by: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Recomputes the sum of line totals from the items.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Total number of portions across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().fold(0, |n, i| n.saturating_add(i.quantity))
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    #[inline]
    pub fn is_unpaid(&self) -> bool {
        self.payment_status == PaymentStatus::Unpaid
    }
}

// =============================================================================
// Settings
// =============================================================================

/// QR payment account shown to the customer at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QrAccount {
    #[serde(default)]
    pub qr_code_uri: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Per-wallet QR configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentQrSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kbzpay: Option<QrAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wavepay: Option<QrAccount>,
}

/// Process-wide settings, persisted on every change.
///
/// Fields missing from a stored payload take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: Language,
    /// Tax rate in basis points.
    pub tax_rate: TaxRate,
    /// ISO 4217 code.
    pub currency: String,
    pub currency_symbol: String,
    pub notifications: bool,
    pub auto_print: bool,
    pub dark_mode: bool,
    #[serde(rename = "paymentQR", skip_serializing_if = "Option::is_none")]
    pub payment_qr: Option<PaymentQrSettings>,
}

impl Default for AppSettings {
    /// Myanmar Kyat, no tax, English UI.
    fn default() -> Self {
        AppSettings {
            language: Language::En,
            tax_rate: TaxRate::zero(),
            currency: "MMK".to_string(),
            currency_symbol: "Ks".to_string(),
            notifications: true,
            auto_print: false,
            dark_mode: false,
            payment_qr: None,
        }
    }
}

impl AppSettings {
    /// Returns a copy with every `Some` field of `update` applied.
    pub fn merged(&self, update: &SettingsUpdate) -> AppSettings {
        let mut next = self.clone();
        if let Some(language) = update.language {
            next.language = language;
        }
        if let Some(tax_rate) = update.tax_rate {
            next.tax_rate = tax_rate;
        }
        if let Some(currency) = &update.currency {
            next.currency = currency.clone();
        }
        if let Some(symbol) = &update.currency_symbol {
            next.currency_symbol = symbol.clone();
        }
        if let Some(notifications) = update.notifications {
            next.notifications = notifications;
        }
        if let Some(auto_print) = update.auto_print {
            next.auto_print = auto_print;
        }
        if let Some(dark_mode) = update.dark_mode {
            next.dark_mode = dark_mode;
        }
        if let Some(payment_qr) = &update.payment_qr {
            next.payment_qr = Some(payment_qr.clone());
        }
        next
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    /// Tax due on an amount at the configured rate.
    pub fn tax_for(&self, amount: Money) -> Money {
        amount.calculate_tax(self.tax_rate)
    }
}

/// Typed partial update for [`AppSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub tax_rate: Option<TaxRate>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub auto_print: Option<bool>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(rename = "paymentQR", default)]
    pub payment_qr: Option<PaymentQrSettings>,
}

impl SettingsUpdate {
    /// Business settings (tax, currency, payment accounts) are admin-only;
    /// the rest are per-device preferences.
    pub fn touches_managed_fields(&self) -> bool {
        self.tax_rate.is_some()
            || self.currency.is_some()
            || self.currency_symbol.is_some()
            || self.payment_qr.is_some()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        !self.touches_managed_fields()
            && self.language.is_none()
            && self.notifications.is_none()
            && self.auto_print.is_none()
            && self.dark_mode.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
