//! # Snapshot State
//!
//! In-memory copies of the menu, orders and settings that the read-side
//! accessors and reports are computed from.
//!
//! ## Refresh Rule
//! ```text
//! write through repository ──► lock snapshot ──► reload collection ──► replace
//! ```
//! Snapshots are never edited in place, so a reader sees either the old
//! collection or the new one. The reload happens while the snapshot's write
//! lock is held, so two refreshes cannot land out of order.

use tokio::sync::{RwLock, RwLockWriteGuard};

use hmpos_core::{AppSettings, MenuItem, Order};

#[derive(Debug, Default)]
pub struct SnapshotState {
    menu: RwLock<Vec<MenuItem>>,
    orders: RwLock<Vec<Order>>,
    settings: RwLock<AppSettings>,
}

impl SnapshotState {
    pub fn new(menu: Vec<MenuItem>, orders: Vec<Order>, settings: AppSettings) -> Self {
        SnapshotState {
            menu: RwLock::new(menu),
            orders: RwLock::new(orders),
            settings: RwLock::new(settings),
        }
    }

    pub async fn menu(&self) -> Vec<MenuItem> {
        self.menu.read().await.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    pub async fn settings(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    pub async fn replace_menu(&self, menu: Vec<MenuItem>) {
        *self.menu.write().await = menu;
    }

    pub async fn replace_orders(&self, orders: Vec<Order>) {
        *self.orders.write().await = orders;
    }

    /// Write access to the menu snapshot, held across a reload.
    pub async fn menu_mut(&self) -> RwLockWriteGuard<'_, Vec<MenuItem>> {
        self.menu.write().await
    }

    /// Write access to the orders snapshot, held across a reload.
    pub async fn orders_mut(&self) -> RwLockWriteGuard<'_, Vec<Order>> {
        self.orders.write().await
    }

    /// Write access to the settings snapshot.
    ///
    /// Settings have no repository write gate; holding this guard across
    /// the save serializes settings updates instead.
    pub async fn settings_mut(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.settings.write().await
    }

    /// Executes a closure over the orders without cloning them.
    pub async fn with_orders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Order]) -> R,
    {
        let orders = self.orders.read().await;
        f(orders.as_slice())
    }

    /// Executes a closure over orders and menu together.
    pub async fn with_orders_and_menu<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Order], &[MenuItem]) -> R,
    {
        let orders = self.orders.read().await;
        let menu = self.menu.read().await;
        f(orders.as_slice(), menu.as_slice())
    }

    /// Drops every snapshot back to empty / default.
    pub async fn reset(&self) {
        self.replace_menu(Vec::new()).await;
        self.replace_orders(Vec::new()).await;
        *self.settings.write().await = AppSettings::default();
    }
}
