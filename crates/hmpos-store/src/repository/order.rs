//! # Order Repository
//!
//! The order collection, stored newest first under `@hmpos_orders`.
//!
//! ## Write Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update(A)                       update(B)                              │
//! │     │ lock gate                     │ waits on gate                     │
//! │     │ read [A, B]                   │                                   │
//! │     │ write [A', B]                 │                                   │
//! │     │ unlock ──────────────────────►│ read [A', B]                      │
//! │                                     │ write [A', B']                    │
//! │                                                                         │
//! │  Every repository handle from the same Store shares one gate, so       │
//! │  racing read-modify-writes queue up instead of clobbering each other.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use hmpos_core::Order;

use super::{load_or_default, save};
use crate::error::{StoreError, StoreResult};
use crate::kv::{keys, KeyValueStore};

/// Repository for the order collection.
///
/// ## Usage
/// ```rust,ignore
/// let order = store.orders().insert_with(|existing| {
///     create_order(draft, &user.id, now, orders_created_on(existing, now))
/// }).await?;
///
/// store.orders().update(&order.id, |o| apply_patch(o, &patch, now)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    kv: Arc<dyn KeyValueStore>,
    gate: Arc<Mutex<()>>,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: Arc<Mutex<()>>) -> Self {
        OrderRepository { kv, gate }
    }

    /// All orders, newest first. Empty when nothing (or nothing readable) is stored.
    pub async fn list(&self) -> StoreResult<Vec<Order>> {
        load_or_default(self.kv.as_ref(), keys::ORDERS).await
    }

    /// Looks up one order.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.list().await?.into_iter().find(|o| o.id == id))
    }

    /// Replaces the whole collection.
    pub async fn save_all(&self, orders: &[Order]) -> StoreResult<()> {
        let _guard = self.gate.lock().await;
        save(self.kv.as_ref(), keys::ORDERS, orders).await
    }

    /// Builds a new order from the current collection and prepends it.
    ///
    /// `build` sees the collection as it is under the gate, so anything it
    /// derives from it (the day's order count) cannot go stale.
    pub async fn insert_with<F, E>(&self, build: F) -> Result<Order, E>
    where
        F: FnOnce(&[Order]) -> Result<Order, E>,
        E: From<StoreError>,
    {
        let _guard = self.gate.lock().await;

        let mut orders: Vec<Order> = load_or_default(self.kv.as_ref(), keys::ORDERS).await?;
        let order = build(&orders)?;
        orders.insert(0, order.clone());
        save(self.kv.as_ref(), keys::ORDERS, &orders).await?;

        debug!(order_id = %order.id, count = orders.len(), "Order inserted");
        Ok(order)
    }

    /// Prepends an already-built order.
    pub async fn insert(&self, order: Order) -> StoreResult<Order> {
        self.insert_with(|_| Ok::<_, StoreError>(order)).await
    }

    /// Mutates one order in place and writes the collection back.
    ///
    /// If `mutate` fails nothing is written.
    ///
    /// ## Errors
    /// - `NotFound` (via `E: From<StoreError>`) for an unknown id
    /// - whatever `mutate` returns
    pub async fn update<F, E>(&self, id: &str, mutate: F) -> Result<Order, E>
    where
        F: FnOnce(&mut Order) -> Result<(), E>,
        E: From<StoreError>,
    {
        let _guard = self.gate.lock().await;

        let mut orders: Vec<Order> = load_or_default(self.kv.as_ref(), keys::ORDERS).await?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;

        mutate(order)?;
        let updated = order.clone();

        save(self.kv.as_ref(), keys::ORDERS, &orders).await?;

        debug!(order_id = %id, status = %updated.status, payment = %updated.payment_status, "Order updated");
        Ok(updated)
    }
}
