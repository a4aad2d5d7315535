//! # Menu Repository
//!
//! Menu items under `@hmpos_menu_items`, in the order they were added.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use hmpos_core::MenuItem;

use super::{load_or_default, save};
use crate::error::{StoreError, StoreResult};
use crate::kv::{keys, KeyValueStore};

/// Repository for menu items. Shares the write-gate pattern of
/// [`OrderRepository`](super::order::OrderRepository).
#[derive(Debug, Clone)]
pub struct MenuRepository {
    kv: Arc<dyn KeyValueStore>,
    gate: Arc<Mutex<()>>,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(kv: Arc<dyn KeyValueStore>, gate: Arc<Mutex<()>>) -> Self {
        MenuRepository { kv, gate }
    }

    pub async fn list(&self) -> StoreResult<Vec<MenuItem>> {
        load_or_default(self.kv.as_ref(), keys::MENU_ITEMS).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.list().await?.into_iter().find(|m| m.id == id))
    }

    /// Replaces the whole menu.
    pub async fn save_all(&self, items: &[MenuItem]) -> StoreResult<()> {
        let _guard = self.gate.lock().await;
        save(self.kv.as_ref(), keys::MENU_ITEMS, items).await
    }

    /// Appends an item.
    pub async fn insert(&self, item: MenuItem) -> StoreResult<MenuItem> {
        let _guard = self.gate.lock().await;

        let mut items: Vec<MenuItem> = load_or_default(self.kv.as_ref(), keys::MENU_ITEMS).await?;
        items.push(item.clone());
        save(self.kv.as_ref(), keys::MENU_ITEMS, &items).await?;

        debug!(item_id = %item.id, name = %item.name, "Menu item added");
        Ok(item)
    }

    /// Mutates one item in place and writes the menu back.
    pub async fn update<F, E>(&self, id: &str, mutate: F) -> Result<MenuItem, E>
    where
        F: FnOnce(&mut MenuItem) -> Result<(), E>,
        E: From<StoreError>,
    {
        let _guard = self.gate.lock().await;

        let mut items: Vec<MenuItem> = load_or_default(self.kv.as_ref(), keys::MENU_ITEMS).await?;
        let item = items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("Menu item", id))?;

        mutate(item)?;
        let updated = item.clone();

        save(self.kv.as_ref(), keys::MENU_ITEMS, &items).await?;

        debug!(item_id = %id, "Menu item updated");
        Ok(updated)
    }

    /// Removes an item. Orders keep their own snapshot, so nothing else changes.
    pub async fn delete(&self, id: &str) -> StoreResult<MenuItem> {
        let _guard = self.gate.lock().await;

        let mut items: Vec<MenuItem> = load_or_default(self.kv.as_ref(), keys::MENU_ITEMS).await?;
        let index = items
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("Menu item", id))?;
        let removed = items.remove(index);

        save(self.kv.as_ref(), keys::MENU_ITEMS, &items).await?;

        debug!(item_id = %id, "Menu item deleted");
        Ok(removed)
    }

    /// Writes `items` only if the menu is empty. Returns whether it did.
    pub async fn seed_if_empty(&self, items: Vec<MenuItem>) -> StoreResult<bool> {
        let _guard = self.gate.lock().await;

        let existing: Vec<MenuItem> = load_or_default(self.kv.as_ref(), keys::MENU_ITEMS).await?;
        if !existing.is_empty() {
            return Ok(false);
        }

        save(self.kv.as_ref(), keys::MENU_ITEMS, &items).await?;
        info!(count = items.len(), "Seeded sample menu");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::Utc;
    use hmpos_core::{Money, MenuItemUpdate};

    fn repo() -> MenuRepository {
        MenuRepository::new(Arc::new(MemoryStore::new()), Arc::new(Mutex::new(())))
    }

    fn item(name: &str, price: i64) -> MenuItem {
        MenuItem::new(name, Money::from_minor(price), "Beverages", Utc::now())
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let repo = repo();
        let tea = repo.insert(item("Tea", 800)).await.unwrap();
        let coffee = repo.insert(item("Coffee", 1200)).await.unwrap();

        let update = MenuItemUpdate {
            available: Some(false),
            ..Default::default()
        };
        let updated = repo
            .update(&tea.id, |m| {
                m.apply_update(&update, Utc::now());
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();
        assert!(!updated.available);

        repo.delete(&coffee.id).await.unwrap();
        let menu = repo.list().await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].id, tea.id);
        assert!(!menu[0].available);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let repo = repo();
        assert!(matches!(
            repo.delete("nope").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let repo = repo();
        assert!(repo.seed_if_empty(vec![item("Tea", 800)]).await.unwrap());
        assert!(!repo.seed_if_empty(vec![item("Coffee", 1200)]).await.unwrap());

        let menu = repo.list().await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Tea");
    }
}
