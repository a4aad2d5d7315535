//! # Aggregation Module
//!
//! Derived views over the order collection: open tables, the kitchen queue,
//! pending alerts and period sales reports.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   &[Order] snapshot ──┬──► active_tables()   ──► Tables screen         │
//! │                       ├──► kitchen_queue()   ──► Kitchen screen        │
//! │                       ├──► pending_count()   ──► Tab badge             │
//! │                       ├──► dashboard_summary() ► Home screen           │
//! │                       └──► sales_report()    ──► Reports screen        │
//! │                                                                         │
//! │   Nothing here is cached. Every view is recomputed from the slice it   │
//! │   is handed, so the same input always yields the same output.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{MenuItem, Order, OrderStatus, PaymentMethod};

// =============================================================================
// Tables
// =============================================================================

/// Everything the tables screen shows for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub table_number: String,
    /// All orders for the table, in collection order.
    pub orders: Vec<Order>,
    /// Most recent order by `created_at`.
    pub latest_order: Order,
    pub unpaid_orders: Vec<Order>,
    pub total_unpaid: Money,
    /// True when the table has no unpaid orders.
    pub is_paid: bool,
}

impl TableSummary {
    fn from_orders(table_number: String, orders: Vec<Order>) -> Option<Self> {
        let latest_order = orders.iter().max_by_key(|o| o.created_at)?.clone();
        let unpaid_orders: Vec<Order> = orders
            .iter()
            .filter(|o| o.is_unpaid())
            .cloned()
            .collect();
        let total_unpaid = unpaid_orders.iter().map(|o| o.total).sum();
        let is_paid = unpaid_orders.is_empty();

        Some(TableSummary {
            table_number,
            orders,
            latest_order,
            unpaid_orders,
            total_unpaid,
            is_paid,
        })
    }

    /// A table stays on screen while money is owed or food is in flight.
    pub fn is_active(&self) -> bool {
        !self.is_paid || self.latest_order.status != OrderStatus::Completed
    }
}

/// Numeric table labels first in numeric order, then the rest alphabetically.
pub fn compare_table_numbers(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Groups orders by table and keeps the tables that are still active.
///
/// ## Example
/// ```rust
/// use hmpos_core::aggregation::active_tables;
///
/// assert!(active_tables(&[]).is_empty());
/// ```
pub fn active_tables(orders: &[Order]) -> Vec<TableSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Order>)> = Vec::new();

    for order in orders {
        match index.get(order.table_number.as_str()) {
            Some(&i) => groups[i].1.push(order.clone()),
            None => {
                index.insert(order.table_number.as_str(), groups.len());
                groups.push((order.table_number.clone(), vec![order.clone()]));
            }
        }
    }

    let mut tables: Vec<TableSummary> = groups
        .into_iter()
        .filter_map(|(table, orders)| TableSummary::from_orders(table, orders))
        .filter(TableSummary::is_active)
        .collect();

    tables.sort_by(|a, b| compare_table_numbers(&a.table_number, &b.table_number));
    tables
}

// =============================================================================
// Kitchen & Order Lists
// =============================================================================

/// Number of orders the kitchen still has to deal with.
pub fn pending_count(orders: &[Order]) -> usize {
    orders.iter().filter(|o| o.status.needs_attention()).count()
}

/// Pending and preparing orders, oldest first.
pub fn kitchen_queue(orders: &[Order]) -> Vec<Order> {
    let mut queue: Vec<Order> = orders
        .iter()
        .filter(|o| o.status.needs_attention())
        .cloned()
        .collect();
    queue.sort_by_key(|o| o.created_at);
    queue
}

/// Orders in the given status (all orders for `None`), newest first.
pub fn orders_with_status(orders: &[Order], status: Option<OrderStatus>) -> Vec<Order> {
    let mut list: Vec<Order> = orders
        .iter()
        .filter(|o| status.map_or(true, |s| o.status == s))
        .cloned()
        .collect();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    list
}

// =============================================================================
// Sales Report
// =============================================================================

/// Reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Same calendar day as "now".
    #[default]
    Daily,
    /// The trailing seven days.
    Weekly,
    /// Same calendar month as "now".
    Monthly,
}

impl ReportPeriod {
    /// Whether `created_at` falls inside this window as seen from `now`.
    ///
    /// Calendar comparisons use `now`'s timezone, so a restaurant in
    /// Yangon gets its own midnight rather than UTC's.
    pub fn contains<Tz: TimeZone>(&self, created_at: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let local = created_at.with_timezone(&now.timezone());
        match self {
            ReportPeriod::Daily => local.date_naive() == now.date_naive(),
            ReportPeriod::Weekly => {
                let end = now.with_timezone(&Utc);
                let start = end - Duration::days(7);
                created_at >= start && created_at <= end
            }
            ReportPeriod::Monthly => local.year() == now.year() && local.month() == now.month(),
        }
    }
}

/// Units sold and revenue for one menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemSales {
    pub menu_item_id: String,
    pub name: String,
    #[serde(rename = "nameMM", default, skip_serializing_if = "Option::is_none")]
    pub name_mm: Option<String>,
    pub quantity: i64,
    pub revenue: Money,
}

/// Count and takings for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub method: PaymentMethod,
    pub count: usize,
    pub total: Money,
}

/// Figures for the reports screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: ReportPeriod,
    /// Orders in the window, paid or not.
    pub total_orders: usize,
    pub paid_orders: usize,
    /// Sum of totals over paid orders in the window.
    pub total_revenue: Money,
    /// `total_revenue / paid_orders`, truncated; zero with no paid orders.
    pub average_order_value: Money,
    /// Highest revenue first.
    pub item_breakdown: Vec<ItemSales>,
    /// In order of first appearance.
    pub payment_breakdown: Vec<PaymentSummary>,
}

/// Builds the sales report for `period` as seen from `now`.
///
/// ## Rules
/// ```text
/// window  = orders with created_at inside the period
/// paid    = window where payment_status == paid
///
/// totalOrders       = |window|
/// totalRevenue      = Σ paid.total
/// averageOrderValue = totalRevenue / |paid|     (0 when |paid| == 0)
/// itemBreakdown     = paid lines grouped by menuItemId, revenue desc
/// paymentBreakdown  = paid grouped by paymentMethod, first seen first
/// ```
pub fn sales_report<Tz: TimeZone>(
    orders: &[Order],
    period: ReportPeriod,
    now: &DateTime<Tz>,
) -> SalesReport {
    let window: Vec<&Order> = orders
        .iter()
        .filter(|o| period.contains(o.created_at, now))
        .collect();
    let paid: Vec<&Order> = window.iter().copied().filter(|o| o.is_paid()).collect();

    let total_revenue: Money = paid.iter().map(|o| o.total).sum();

    SalesReport {
        period,
        total_orders: window.len(),
        paid_orders: paid.len(),
        total_revenue,
        average_order_value: total_revenue.divide(paid.len()),
        item_breakdown: item_breakdown(&paid),
        payment_breakdown: payment_breakdown(&paid),
    }
}

fn item_breakdown(paid: &[&Order]) -> Vec<ItemSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<ItemSales> = Vec::new();

    for line in paid.iter().flat_map(|o| o.items.iter()) {
        let revenue = line.line_total();
        match index.get(line.menu_item_id.as_str()) {
            Some(&i) => {
                items[i].quantity = items[i].quantity.saturating_add(line.quantity);
                items[i].revenue += revenue;
            }
            None => {
                index.insert(line.menu_item_id.as_str(), items.len());
                items.push(ItemSales {
                    menu_item_id: line.menu_item_id.clone(),
                    name: line.name.clone(),
                    name_mm: line.menu_item.name_mm.clone(),
                    quantity: line.quantity,
                    revenue,
                });
            }
        }
    }

    // sort_by is stable: equal revenue keeps first-seen order
    items.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    items
}

fn payment_breakdown(paid: &[&Order]) -> Vec<PaymentSummary> {
    let mut breakdown: Vec<PaymentSummary> = Vec::new();

    // Legacy paid orders without a method are left out
    for order in paid {
        let Some(method) = order.payment_method else {
            continue;
        };
        match breakdown.iter_mut().find(|p| p.method == method) {
            Some(summary) => {
                summary.count += 1;
                summary.total += order.total;
            }
            None => breakdown.push(PaymentSummary {
                method,
                count: 1,
                total: order.total,
            }),
        }
    }

    breakdown
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_orders: usize,
    pub today_revenue: Money,
    pub pending_orders: usize,
    pub available_items: usize,
    pub unavailable_items: usize,
}

pub fn dashboard_summary<Tz: TimeZone>(
    orders: &[Order],
    menu: &[MenuItem],
    now: &DateTime<Tz>,
) -> DashboardSummary {
    let today = sales_report(orders, ReportPeriod::Daily, now);
    let available_items = menu.iter().filter(|m| m.available).count();

    DashboardSummary {
        today_orders: today.total_orders,
        today_revenue: today.total_revenue,
        pending_orders: pending_count(orders),
        available_items,
        unavailable_items: menu.len() - available_items,
    }
}

/// Distinct menu categories in first-seen order.
pub fn menu_categories(menu: &[MenuItem]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for item in menu {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

// =============================================================================
// Unit Tests
// =============================================================================
