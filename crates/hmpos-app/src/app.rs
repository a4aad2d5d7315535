//! # Application Facade
//!
//! [`PosApp`] is the one place the screens talk to. Every mutation goes
//! through it, and it is the only place permissions are enforced.
//!
//! ## Call Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  screen ──► PosApp::update_order(id, patch)                            │
//! │                 │                                                       │
//! │                 ├─► patch.required_actions() ──► authorize(each)       │
//! │                 │        denied? ──► PermissionDenied (no store I/O)    │
//! │                 │                                                       │
//! │                 ├─► OrderRepository::update(id, |o| apply_patch(..))   │
//! │                 │        (under the order write gate)                   │
//! │                 │                                                       │
//! │                 └─► reload orders ──► replace snapshot                  │
//! │                                                                         │
//! │  screen ──► PosApp::active_tables() ──► aggregation over snapshot       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, warn};

use hmpos_core::aggregation::{self, DashboardSummary, ReportPeriod, SalesReport, TableSummary};
use hmpos_core::lifecycle::{apply_patch, create_order, orders_created_on, OrderDraft, OrderPatch};
use hmpos_core::permissions::{ensure_permitted, Action};
use hmpos_core::validation::{validate_menu_item, validate_menu_item_update, validate_tax_rate_bps};
use hmpos_core::{
    AppSettings, Language, MenuItem, MenuItemUpdate, Order, OrderStatus, SettingsUpdate, User,
    ValidationError,
};
use hmpos_store::{seed_store, Store};

use crate::error::{AppError, AppResult};
use crate::state::{AppConfig, SessionState, SnapshotState};

// =============================================================================
// PosApp
// =============================================================================

/// The application facade.
///
/// ## Usage
/// ```rust,ignore
/// let config = AppConfig::from_env();
/// let app = PosApp::open_with_config(config).await?;
///
/// if app.login("cashier@hmpos.com", "hmpos123").await? {
///     let order = app.add_order(draft).await?;
///     app.update_order(&order.id, OrderPatch::pay(PaymentMethod::Cash)).await?;
/// }
/// ```
#[derive(Debug)]
pub struct PosApp {
    store: Store,
    config: AppConfig,
    session: SessionState,
    snapshot: SnapshotState,
}

impl PosApp {
    /// Bootstraps the app over an opened store.
    ///
    /// ## Startup Sequence
    /// 1. Seed the sample menu and demo accounts (if enabled and empty)
    /// 2. Load settings, menu and orders into the snapshots
    /// 3. Restore the persisted session
    pub async fn open(store: Store, config: AppConfig) -> AppResult<Self> {
        if config.seed_on_empty {
            seed_store(&store, &config.demo_password, Utc::now()).await?;
        }

        let settings = store.settings().load().await?;
        let menu = store.menu().list().await?;
        let orders = store.orders().list().await?;

        info!(
            store_name = %config.store_name,
            menu_items = menu.len(),
            orders = orders.len(),
            "POS app opened"
        );

        let app = PosApp {
            store,
            config,
            session: SessionState::new(),
            snapshot: SnapshotState::new(menu, orders, settings),
        };
        app.restore_session().await?;
        Ok(app)
    }

    /// Opens the store the config points at, then bootstraps.
    pub async fn open_with_config(config: AppConfig) -> AppResult<Self> {
        let store = Store::open(config.store_config()).await?;
        PosApp::open(store, config).await
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Checks `action` against the current user and returns that user.
    async fn authorize(&self, action: Action) -> AppResult<Option<User>> {
        let user = self.session.current().await;
        if let Err(err) = ensure_permitted(user.as_ref(), action) {
            warn!(
                action = %action,
                user_id = user.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
                "Permission denied"
            );
            return Err(err.into());
        }
        Ok(user)
    }

    /// Like [`authorize`](Self::authorize) for actions that need someone signed in.
    async fn require_user(&self, action: Action) -> AppResult<User> {
        self.authorize(action).await?.ok_or(AppError::denied(action))
    }

    // The snapshot lock is taken before the read: whichever refresh runs
    // last also read last, so a slow reload cannot overwrite a newer one.
    async fn reload_menu(&self) -> AppResult<()> {
        let mut menu = self.snapshot.menu_mut().await;
        *menu = self.store.menu().list().await?;
        Ok(())
    }

    async fn reload_orders(&self) -> AppResult<()> {
        let mut orders = self.snapshot.orders_mut().await;
        *orders = self.store.orders().list().await?;
        Ok(())
    }

    /// Re-reads menu, orders and settings from the store.
    pub async fn reload(&self) -> AppResult<()> {
        self.reload_menu().await?;
        self.reload_orders().await?;
        let settings = self.store.settings().load().await?;
        *self.snapshot.settings_mut().await = settings;
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Signs a staff member in.
    ///
    /// ## Returns
    /// * `Ok(true)` - signed in, session persisted
    /// * `Ok(false)` - unknown email or wrong password
    /// * `Err(Storage)` - the store could not be read or written
    pub async fn login(&self, email: &str, password: &str) -> AppResult<bool> {
        let Some(user) = self.store.users().authenticate(email, password).await? else {
            info!(email = %email, "Login rejected");
            return Ok(false);
        };

        self.store.session().save(&user).await?;
        info!(user_id = %user.id, role = %user.role, "Logged in");
        self.session.set(user).await;
        Ok(true)
    }

    /// Signs out and forgets the persisted session.
    ///
    /// If the persisted session cannot be removed the user stays signed in,
    /// so memory never disagrees with what the next start will restore.
    pub async fn logout(&self) -> AppResult<()> {
        self.store.session().clear().await?;
        if let Some(user) = self.session.current().await {
            info!(user_id = %user.id, "Logged out");
        }
        self.session.clear().await;
        Ok(())
    }

    /// Picks up the session saved by a previous run.
    pub async fn restore_session(&self) -> AppResult<Option<User>> {
        let user = self.store.session().load().await?;
        match &user {
            Some(user) => {
                debug!(user_id = %user.id, "Session restored");
                self.session.set(user.clone()).await;
            }
            None => self.session.clear().await,
        }
        Ok(user)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.current().await
    }

    // =========================================================================
    // Menu
    // =========================================================================

    pub async fn menu_items(&self) -> Vec<MenuItem> {
        self.snapshot.menu().await
    }

    /// Distinct categories in menu order, for the filter chips.
    pub async fn menu_categories(&self) -> Vec<String> {
        aggregation::menu_categories(&self.snapshot.menu().await)
    }

    /// Adds a dish. Admin only.
    pub async fn add_menu_item(&self, item: MenuItem) -> AppResult<MenuItem> {
        self.authorize(Action::AddMenuItem).await?;

        let mut item = item.normalized();
        validate_menu_item(&item)?;

        let now = Utc::now();
        if item.created_at.is_none() {
            item.created_at = Some(now);
        }
        item.updated_at = Some(now);

        let item = self.store.menu().insert(item).await?;
        info!(item_id = %item.id, name = %item.name, "Menu item added");
        self.reload_menu().await?;
        Ok(item)
    }

    /// Applies a partial update to a dish. Admin only.
    pub async fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> AppResult<MenuItem> {
        self.authorize(Action::EditMenu).await?;
        validate_menu_item_update(&update)?;

        let now = Utc::now();
        let item = self
            .store
            .menu()
            .update(id, |item| {
                item.apply_update(&update, now);
                Ok::<_, AppError>(())
            })
            .await?;

        self.reload_menu().await?;
        Ok(item)
    }

    /// Removes a dish. Admin only. Existing orders keep their snapshot.
    pub async fn delete_menu_item(&self, id: &str) -> AppResult<()> {
        self.authorize(Action::DeleteMenu).await?;

        let removed = self.store.menu().delete(id).await?;
        info!(item_id = %removed.id, name = %removed.name, "Menu item deleted");
        self.reload_menu().await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// All orders, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.snapshot.orders().await
    }

    pub async fn order(&self, id: &str) -> Option<Order> {
        self.snapshot
            .with_orders(|orders| orders.iter().find(|o| o.id == id).cloned())
            .await
    }

    /// Submits a draft as a new order. Admin and cashier.
    ///
    /// The order number is derived from the collection as it stands under
    /// the order write gate.
    pub async fn add_order(&self, draft: OrderDraft) -> AppResult<Order> {
        let user = self.require_user(Action::CreateOrder).await?;
        let now = Utc::now();

        let order = self
            .store
            .orders()
            .insert_with(|existing| {
                create_order(draft, &user.id, now, orders_created_on(existing, now))
                    .map_err(AppError::from)
            })
            .await?;

        info!(
            order_id = %order.id,
            order_number = order.order_number.as_deref().unwrap_or("-"),
            table = %order.table_number,
            portions = order.item_count(),
            total = order.total.minor(),
            "Order created"
        );
        self.reload_orders().await?;
        Ok(order)
    }

    /// Changes an order's status and/or payment.
    ///
    /// ## Permissions
    /// | Patch touches | Needs                         |
    /// |---------------|-------------------------------|
    /// | status        | update order status           |
    /// | payment       | process payment               |
    /// | both          | both                          |
    ///
    /// An empty patch is a validation error, but only for a caller who could
    /// change order status; anyone else gets `PermissionDenied` first.
    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> AppResult<Order> {
        if patch.is_empty() {
            self.require_user(Action::UpdateOrderStatus).await?;
            return Err(ValidationError::EmptyUpdate {
                entity: "order".to_string(),
            }
            .into());
        }

        for action in patch.required_actions() {
            self.authorize(action).await?;
        }

        let now = Utc::now();
        let order = self
            .store
            .orders()
            .update(id, |order| apply_patch(order, &patch, now).map_err(AppError::from))
            .await?;

        info!(
            order_id = %order.id,
            status = %order.status,
            payment = %order.payment_status,
            "Order updated"
        );
        self.reload_orders().await?;
        Ok(order)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn settings(&self) -> AppSettings {
        self.snapshot.settings().await
    }

    /// Merges `update` into the settings and persists them.
    ///
    /// Tax, currency and payment QR accounts need the manage-settings
    /// permission. Language and the display toggles do not.
    pub async fn update_settings(&self, update: SettingsUpdate) -> AppResult<AppSettings> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate {
                entity: "settings".to_string(),
            }
            .into());
        }

        if update.touches_managed_fields() {
            self.authorize(Action::ManageSettings).await?;
        }

        if let Some(rate) = update.tax_rate {
            validate_tax_rate_bps(rate.bps())?;
        }
        for (field, value) in [
            ("currency", &update.currency),
            ("currency symbol", &update.currency_symbol),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                }
                .into());
            }
        }

        let mut settings = self.snapshot.settings_mut().await;
        let next = settings.merged(&update);
        self.store.settings().save(&next).await?;
        *settings = next.clone();

        debug!(language = ?next.language, tax_bps = next.tax_rate.bps(), "Settings saved");
        Ok(next)
    }

    pub async fn set_language(&self, language: Language) -> AppResult<AppSettings> {
        self.update_settings(SettingsUpdate {
            language: Some(language),
            ..Default::default()
        })
        .await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Tables with money owed or food in flight.
    pub async fn active_tables(&self) -> Vec<TableSummary> {
        self.snapshot.with_orders(aggregation::active_tables).await
    }

    /// Orders waiting on the kitchen (the alert badge).
    pub async fn pending_count(&self) -> usize {
        self.snapshot.with_orders(aggregation::pending_count).await
    }

    /// Kitchen display: pending and preparing, oldest first.
    pub async fn kitchen_queue(&self) -> Vec<Order> {
        self.snapshot.with_orders(aggregation::kitchen_queue).await
    }

    /// Order list filtered by status (`None` for all), newest first.
    pub async fn orders_with_status(&self, status: Option<OrderStatus>) -> Vec<Order> {
        self.snapshot
            .with_orders(|orders| aggregation::orders_with_status(orders, status))
            .await
    }

    /// Sales for the period around `now`. Calendar windows use `now`'s timezone.
    pub async fn sales_report<Tz: TimeZone>(
        &self,
        period: ReportPeriod,
        now: &DateTime<Tz>,
    ) -> AppResult<SalesReport> {
        self.authorize(Action::ViewReports).await?;
        Ok(self
            .snapshot
            .with_orders(|orders| aggregation::sales_report(orders, period, now))
            .await)
    }

    pub async fn dashboard<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DashboardSummary {
        self.snapshot
            .with_orders_and_menu(|orders, menu| aggregation::dashboard_summary(orders, menu, now))
            .await
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Wipes every stored collection and signs out. Admin only.
    pub async fn clear_all_data(&self) -> AppResult<()> {
        let user = self.require_user(Action::ClearAllData).await?;

        self.store.clear_all().await?;
        self.snapshot.reset().await;
        self.session.clear().await;

        warn!(user_id = %user.id, "All data cleared");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::FixedOffset;
    use hmpos_core::{Money, PaymentMethod, PaymentStatus, Role, TaxRate};
    use hmpos_store::{MemoryStore, StoreConfig};

    use crate::error::ErrorCode;

    const PASSWORD: &str = "test-pass";

    fn test_config() -> AppConfig {
        AppConfig {
            demo_password: PASSWORD.to_string(),
            ..AppConfig::default()
        }
    }

    async fn open_app() -> PosApp {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        PosApp::open(store, test_config()).await.unwrap()
    }

    async fn open_as(email: &str) -> PosApp {
        let app = open_app().await;
        assert!(app.login(email, PASSWORD).await.unwrap());
        app
    }

    fn draft(table: &str, lines: &[(i64, i64)]) -> OrderDraft {
        let mut draft = OrderDraft::new(table);
        for (i, &(price, qty)) in lines.iter().enumerate() {
            draft.add_line(format!("m-{}", i), format!("Dish {}", i), Money::from_minor(price), qty);
        }
        draft
    }

    fn assert_denied(err: AppError, expected: Action) {
        match err {
            AppError::PermissionDenied { action } => assert_eq!(action, expected),
            other => panic!("expected PermissionDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_seeds_and_starts_logged_out() {
        let app = open_app().await;
        assert_eq!(app.menu_items().await.len(), 8);
        assert!(app.orders().await.is_empty());
        assert!(app.current_user().await.is_none());
        assert_eq!(app.settings().await, AppSettings::default());
        assert!(app.menu_categories().await.contains(&"beverages".to_string()));
    }

    #[tokio::test]
    async fn test_open_without_seeding() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let config = AppConfig {
            seed_on_empty: false,
            ..test_config()
        };
        let app = PosApp::open(store, config).await.unwrap();
        assert!(app.menu_items().await.is_empty());
        assert!(!app.login("admin@hmpos.com", PASSWORD).await.unwrap());
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_is_case_insensitive() {
        let app = open_app().await;
        assert!(app.login("Cashier@HMPOS.com", PASSWORD).await.unwrap());
        assert_eq!(app.current_user().await.map(|u| u.role), Some(Role::Cashier));
    }

    #[tokio::test]
    async fn test_login_failure_is_not_an_error() {
        let app = open_app().await;
        assert!(!app.login("admin@hmpos.com", "wrong").await.unwrap());
        assert!(!app.login("nobody@hmpos.com", PASSWORD).await.unwrap());
        assert!(app.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_login_with_store_down_is_storage_error() {
        let kv = Arc::new(MemoryStore::new());
        let store = Store::with_backend(kv.clone());
        let app = PosApp::open(store, test_config()).await.unwrap();

        kv.set_unavailable(true);
        let err = app.login("admin@hmpos.com", PASSWORD).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
        assert!(app.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_user_signed_in() {
        let kv = Arc::new(MemoryStore::new());
        let store = Store::with_backend(kv.clone());
        let app = PosApp::open(store.clone(), test_config()).await.unwrap();
        assert!(app.login("cashier@hmpos.com", PASSWORD).await.unwrap());

        kv.set_unavailable(true);
        let err = app.logout().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
        assert_eq!(app.current_user().await.map(|u| u.role), Some(Role::Cashier));

        kv.set_unavailable(false);
        let restarted = PosApp::open(store, test_config()).await.unwrap();
        assert_eq!(restarted.current_user().await.map(|u| u.role), Some(Role::Cashier));

        app.logout().await.unwrap();
        assert!(app.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_session_survives_restart_until_logout() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        let app = PosApp::open(store.clone(), test_config()).await.unwrap();
        assert!(app.login("kitchen@hmpos.com", PASSWORD).await.unwrap());
        drop(app);

        let app = PosApp::open(store.clone(), test_config()).await.unwrap();
        assert_eq!(app.current_user().await.map(|u| u.id), Some("kitchen-1".to_string()));

        app.logout().await.unwrap();
        assert!(app.current_user().await.is_none());

        let app = PosApp::open(store, test_config()).await.unwrap();
        assert!(app.current_user().await.is_none());
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_non_admin_cannot_add_menu_item() {
        for email in [None, Some("cashier@hmpos.com"), Some("kitchen@hmpos.com")] {
            let app = match email {
                Some(email) => open_as(email).await,
                None => open_app().await,
            };
            let before = app.store().menu().list().await.unwrap();

            let item = MenuItem::new("Fried Rice", Money::from_minor(3000), "Main Course", Utc::now());
            let err = app.add_menu_item(item).await.unwrap_err();

            assert_denied(err, Action::AddMenuItem);
            assert_eq!(app.store().menu().list().await.unwrap(), before);
            assert_eq!(app.menu_items().await, before);
        }
    }

    #[tokio::test]
    async fn test_admin_menu_crud() {
        let app = open_as("admin@hmpos.com").await;

        let item = MenuItem::new("Fried Rice", Money::from_minor(3000), "  Main Course ", Utc::now());
        let added = app.add_menu_item(item).await.unwrap();
        assert_eq!(added.category, "main course");
        assert_eq!(app.menu_items().await.len(), 9);

        let updated = app
            .update_menu_item(
                &added.id,
                MenuItemUpdate {
                    price: Some(Money::from_minor(3500)),
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Money::from_minor(3500));
        assert!(!updated.available);
        assert!(updated.updated_at >= added.updated_at);

        app.delete_menu_item(&added.id).await.unwrap();
        assert_eq!(app.menu_items().await.len(), 8);

        let err = app.delete_menu_item(&added.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_menu_validation() {
        let app = open_as("admin@hmpos.com").await;

        let free = MenuItem::new("Water", Money::zero(), "Beverages", Utc::now());
        assert_eq!(app.add_menu_item(free).await.unwrap_err().code(), ErrorCode::ValidationError);

        let id = app.menu_items().await[0].id.clone();
        let err = app.update_menu_item(&id, MenuItemUpdate::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = app
            .update_menu_item(
                "missing",
                MenuItemUpdate {
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_order_totals_and_numbers() {
        let app = open_as("cashier@hmpos.com").await;

        let order = app.add_order(draft("5", &[(1000, 2), (500, 1)])).await.unwrap();
        assert_eq!(order.total, Money::from_minor(2500));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.created_by, "cashier-1");

        let second = app.add_order(draft("6", &[(800, 1)])).await.unwrap();
        let first_number = order.order_number.unwrap();
        let second_number = second.order_number.unwrap();
        assert!(first_number.ends_with("-0001"));
        assert!(second_number.ends_with("-0002"));

        // newest first
        let ids: Vec<String> = app.orders().await.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, order.id]);
    }

    #[tokio::test]
    async fn test_add_order_from_menu_snapshot() {
        let app = open_as("admin@hmpos.com").await;
        let menu = app.menu_items().await;

        let draft = OrderDraft::from_menu("2", [(&menu[0], 2), (&menu[3], 1), (&menu[0], 1)]).unwrap();
        let order = app.add_order(draft).await.unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, menu[0].price * 3 + menu[3].price);

        // editing the menu afterwards leaves the order's snapshot alone
        app.update_menu_item(
            &menu[0].id,
            MenuItemUpdate {
                price: Some(Money::from_minor(9999)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stored = app.order(&order.id).await.unwrap();
        assert_eq!(stored.items[0].price, menu[0].price);
        assert_eq!(stored.items[0].menu_item.price, menu[0].price);
    }

    #[tokio::test]
    async fn test_kitchen_cannot_create_orders() {
        let app = open_as("kitchen@hmpos.com").await;
        let err = app.add_order(draft("1", &[(1000, 1)])).await.unwrap_err();
        assert_denied(err, Action::CreateOrder);
        assert!(app.store().orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let app = open_as("cashier@hmpos.com").await;

        let err = app.add_order(draft("  ", &[(1000, 1)])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = app.add_order(draft("4", &[])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = app.add_order(draft("4", &[(1000, 1000)])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        assert!(app.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_payment_permissions_by_role() {
        let app = open_as("cashier@hmpos.com").await;
        let a = app.add_order(draft("1", &[(2000, 1)])).await.unwrap();
        let b = app.add_order(draft("2", &[(2000, 1)])).await.unwrap();

        let paid = app
            .update_order(&a.id, OrderPatch::pay(PaymentMethod::Cash))
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));
        assert!(paid.updated_at.is_some());

        assert!(app.login("kitchen@hmpos.com", PASSWORD).await.unwrap());
        let err = app
            .update_order(&b.id, OrderPatch::pay(PaymentMethod::Cash))
            .await
            .unwrap_err();
        assert_denied(err, Action::ProcessPayment);
        assert_eq!(
            app.store().orders().get(&b.id).await.unwrap().unwrap().payment_status,
            PaymentStatus::Unpaid
        );
    }

    #[tokio::test]
    async fn test_combined_patch_needs_both_permissions() {
        let app = open_as("cashier@hmpos.com").await;
        let order = app.add_order(draft("1", &[(1000, 1)])).await.unwrap();

        assert!(app.login("kitchen@hmpos.com", PASSWORD).await.unwrap());
        let patch = OrderPatch {
            status: Some(OrderStatus::Preparing),
            payment_status: Some(PaymentStatus::Paid),
            payment_method: Some(PaymentMethod::Kbzpay),
        };
        let err = app.update_order(&order.id, patch.clone()).await.unwrap_err();
        assert_denied(err, Action::ProcessPayment);
        assert_eq!(app.order(&order.id).await.unwrap().status, OrderStatus::Pending);

        assert!(app.login("cashier@hmpos.com", PASSWORD).await.unwrap());
        let updated = app.update_order(&order.id, patch).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.payment_method, Some(PaymentMethod::Kbzpay));
    }

    #[tokio::test]
    async fn test_kitchen_moves_orders_forward_only() {
        let app = open_as("cashier@hmpos.com").await;
        let order = app.add_order(draft("7", &[(1000, 1)])).await.unwrap();

        assert!(app.login("kitchen@hmpos.com", PASSWORD).await.unwrap());
        for status in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Completed] {
            let updated = app.update_order(&order.id, OrderPatch::status(status)).await.unwrap();
            assert_eq!(updated.status, status);
        }

        let err = app
            .update_order(&order.id, OrderPatch::status(OrderStatus::Preparing))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
        assert_eq!(app.order(&order.id).await.unwrap().status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_order_errors() {
        let app = open_as("admin@hmpos.com").await;

        let err = app
            .update_order("missing", OrderPatch::status(OrderStatus::Preparing))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let order = app.add_order(draft("1", &[(1000, 1)])).await.unwrap();
        let err = app.update_order(&order.id, OrderPatch::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        app.logout().await.unwrap();
        let err = app.update_order(&order.id, OrderPatch::default()).await.unwrap_err();
        assert_denied(err, Action::UpdateOrderStatus);
        app.login("admin@hmpos.com", PASSWORD).await.unwrap();

        let err = app.update_order(&order.id, OrderPatch::refund()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_racing_updates_both_land() {
        let app = open_as("admin@hmpos.com").await;
        let a = app.add_order(draft("1", &[(1000, 1)])).await.unwrap();
        let b = app.add_order(draft("2", &[(1000, 1)])).await.unwrap();

        let (ra, rb) = tokio::join!(
            app.update_order(&a.id, OrderPatch::pay(PaymentMethod::Wavepay)),
            app.update_order(&b.id, OrderPatch::status(OrderStatus::Preparing)),
        );
        ra.unwrap();
        rb.unwrap();

        let stored = app.store().orders().list().await.unwrap();
        let stored_a = stored.iter().find(|o| o.id == a.id).unwrap();
        let stored_b = stored.iter().find(|o| o.id == b.id).unwrap();
        assert_eq!(stored_a.payment_status, PaymentStatus::Paid);
        assert_eq!(stored_b.status, OrderStatus::Preparing);

        let seen_a = app.order(&a.id).await.unwrap();
        let seen_b = app.order(&b.id).await.unwrap();
        assert_eq!(seen_a.payment_status, PaymentStatus::Paid);
        assert_eq!(seen_b.status, OrderStatus::Preparing);
        assert_eq!(app.orders().await, stored);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_matches_store_after_concurrent_writes() {
        let app = Arc::new(open_as("admin@hmpos.com").await);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let app = Arc::clone(&app);
            tasks.push(tokio::spawn(async move {
                let order = app.add_order(draft(&(i % 4 + 1).to_string(), &[(1000, 1)])).await?;
                app.update_order(&order.id, OrderPatch::pay(PaymentMethod::Cash)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = app.store().orders().list().await.unwrap();
        assert_eq!(stored.len(), 16);
        assert!(stored.iter().all(|o| o.is_paid()));
        assert_eq!(app.orders().await, stored);

        let mut menu_tasks = Vec::new();
        for i in 0..8 {
            let app = Arc::clone(&app);
            menu_tasks.push(tokio::spawn(async move {
                let dish = MenuItem::new(format!("Dish {}", i), Money::from_minor(1000), "specials", Utc::now());
                app.add_menu_item(dish).await
            }));
        }
        for task in menu_tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(app.menu_items().await, app.store().menu().list().await.unwrap());
    }

    #[tokio::test]
    async fn test_orders_round_trip_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..test_config()
        };

        let before = {
            let app = PosApp::open_with_config(config.clone()).await.unwrap();
            assert!(app.login("cashier@hmpos.com", PASSWORD).await.unwrap());
            let order = app.add_order(draft("3", &[(1500, 2)])).await.unwrap();
            app.update_order(&order.id, OrderPatch::pay(PaymentMethod::Cash))
                .await
                .unwrap();
            app.orders().await
        };

        let app = PosApp::open_with_config(config).await.unwrap();
        assert_eq!(app.orders().await, before);
        assert_eq!(app.current_user().await.map(|u| u.role), Some(Role::Cashier));
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_table_with_unpaid_order_stays_active() {
        let app = open_as("cashier@hmpos.com").await;

        let settled = app.add_order(draft("3", &[(3000, 1)])).await.unwrap();
        app.update_order(&settled.id, OrderPatch::pay(PaymentMethod::Cash))
            .await
            .unwrap();
        for status in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Completed] {
            app.update_order(&settled.id, OrderPatch::status(status)).await.unwrap();
        }
        app.add_order(draft("3", &[(4500, 1)])).await.unwrap();

        let tables = app.active_tables().await;
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_number, "3");
        assert_eq!(tables[0].total_unpaid, Money::from_minor(4500));
        assert!(!tables[0].is_paid);
        assert_eq!(tables[0].orders.len(), 2);
        assert_eq!(app.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_daily_report() {
        let app = open_as("cashier@hmpos.com").await;

        for (price, pay) in [(3000, true), (4000, true), (2000, false)] {
            let order = app.add_order(draft("1", &[(price, 1)])).await.unwrap();
            if pay {
                app.update_order(&order.id, OrderPatch::pay(PaymentMethod::Cash))
                    .await
                    .unwrap();
            }
        }

        let now = Utc::now();
        let report = app.sales_report(ReportPeriod::Daily, &now).await.unwrap();
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.paid_orders, 2);
        assert_eq!(report.total_revenue, Money::from_minor(7000));
        assert_eq!(report.average_order_value, Money::from_minor(3500));

        // same snapshot, same answer
        let again = app.sales_report(ReportPeriod::Daily, &now).await.unwrap();
        assert_eq!(report, again);

        let dashboard = app.dashboard(&now).await;
        assert_eq!(dashboard.today_orders, 3);
        assert_eq!(dashboard.today_revenue, Money::from_minor(7000));
        assert_eq!(dashboard.pending_orders, 3);
        assert_eq!(dashboard.available_items, 8);
    }

    #[tokio::test]
    async fn test_reports_open_to_everyone() {
        let app = open_app().await;
        let yangon = FixedOffset::east_opt(6 * 3600 + 1800).unwrap();
        let now = Utc::now().with_timezone(&yangon);
        let report = app.sales_report(ReportPeriod::Monthly, &now).await.unwrap();
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.average_order_value, Money::zero());
    }

    #[tokio::test]
    async fn test_kitchen_queue_and_status_filter() {
        let app = open_as("cashier@hmpos.com").await;
        let first = app.add_order(draft("1", &[(1000, 1)])).await.unwrap();
        let second = app.add_order(draft("2", &[(1000, 1)])).await.unwrap();
        app.update_order(&second.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();

        let queue: Vec<String> = app.kitchen_queue().await.into_iter().map(|o| o.id).collect();
        assert_eq!(queue, vec![first.id.clone()]);

        let cancelled = app.orders_with_status(Some(OrderStatus::Cancelled)).await;
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, second.id);
        assert_eq!(app.orders_with_status(None).await.len(), 2);
    }

    // -------------------------------------------------------------------------
    // Settings & maintenance
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_settings_permissions() {
        let app = open_as("cashier@hmpos.com").await;

        let settings = app.set_language(Language::Mm).await.unwrap();
        assert_eq!(settings.language, Language::Mm);

        let err = app
            .update_settings(SettingsUpdate {
                tax_rate: Some(TaxRate::from_bps(500)),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_denied(err, Action::ManageSettings);

        assert!(app.login("admin@hmpos.com", PASSWORD).await.unwrap());
        let settings = app
            .update_settings(SettingsUpdate {
                tax_rate: Some(TaxRate::from_bps(500)),
                dark_mode: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(settings.tax_rate, TaxRate::from_bps(500));
        assert_eq!(settings.language, Language::Mm);
        assert_eq!(app.store().settings().load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_settings_validation() {
        let app = open_as("admin@hmpos.com").await;

        let err = app.update_settings(SettingsUpdate::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = app
            .update_settings(SettingsUpdate {
                tax_rate: Some(TaxRate::from_bps(10_001)),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = app
            .update_settings(SettingsUpdate {
                currency_symbol: Some(" ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(app.settings().await, AppSettings::default());
    }

    #[tokio::test]
    async fn test_clear_all_data_is_admin_only() {
        let app = open_as("cashier@hmpos.com").await;
        app.add_order(draft("1", &[(1000, 1)])).await.unwrap();

        let err = app.clear_all_data().await.unwrap_err();
        assert_denied(err, Action::ClearAllData);
        assert_eq!(app.orders().await.len(), 1);

        assert!(app.login("admin@hmpos.com", PASSWORD).await.unwrap());
        app.clear_all_data().await.unwrap();

        assert!(app.orders().await.is_empty());
        assert!(app.menu_items().await.is_empty());
        assert!(app.current_user().await.is_none());
        assert!(app.store().users().list().await.unwrap().is_empty());
        assert!(app.store().session().load().await.unwrap().is_none());
    }
}
