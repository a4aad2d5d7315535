//! # Sample Data
//!
//! The starter menu and demo staff accounts a fresh install comes with.
//!
//! | Account             | Role    |
//! |---------------------|---------|
//! | `admin@hmpos.com`   | admin   |
//! | `cashier@hmpos.com` | cashier |
//! | `kitchen@hmpos.com` | kitchen |
//!
//! All three share the demo password passed in by the caller.

use chrono::{DateTime, Utc};
use tracing::info;

use hmpos_core::{MenuItem, Money, Role};

use crate::error::StoreResult;
use crate::repository::user::UserAccount;
use crate::store::Store;

/// `(name, Myanmar name, price in Ks, category)`
const SAMPLE_MENU: &[(&str, &str, i64, &str)] = &[
    ("Wet Salad", "ဝက်ဆလပ်", 3000, "Salad"),
    ("Mala Shan Kaut", "မာလာရှမ်းကော", 4500, "Main Course"),
    ("Mala Mok Chauk", "မာလာမောက်ချိုက်", 4000, "Main Course"),
    ("Cold Drink", "အအေးဖျော်ရည်", 1000, "Beverages"),
    ("Purified Water", "သန့်ရှင်းသောရေ", 500, "Beverages"),
    ("Shan Noodles", "ရှမ်းခေါက်ဆွဲ", 3500, "Main Course"),
    ("Tea", "လက်ဖက်ရည်", 800, "Beverages"),
    ("Coffee", "ကော်ဖီ", 1200, "Beverages"),
];

/// `(id, email, name, role)`
const DEMO_USERS: &[(&str, &str, &str, Role)] = &[
    ("admin-1", "admin@hmpos.com", "Admin User", Role::Admin),
    ("cashier-1", "cashier@hmpos.com", "Cashier User", Role::Cashier),
    ("kitchen-1", "kitchen@hmpos.com", "Kitchen Staff", Role::Kitchen),
];

pub fn sample_menu(now: DateTime<Utc>) -> Vec<MenuItem> {
    SAMPLE_MENU
        .iter()
        .map(|&(name, name_mm, price, category)| {
            MenuItem::new(name, Money::from_minor(price), category, now).with_name_mm(name_mm)
        })
        .collect()
}

pub fn demo_accounts(password: &str, now: DateTime<Utc>) -> StoreResult<Vec<UserAccount>> {
    DEMO_USERS
        .iter()
        .map(|&(id, email, name, role)| UserAccount::new(id, email, name, role, password, now))
        .collect()
}

/// What [`seed_store`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub menu_seeded: bool,
    pub users_seeded: bool,
}

/// Seeds the menu and the accounts, each only if currently empty.
pub async fn seed_store(store: &Store, password: &str, now: DateTime<Utc>) -> StoreResult<SeedReport> {
    let menu_seeded = store.menu().seed_if_empty(sample_menu(now)).await?;

    let users_seeded = if store.users().list().await?.is_empty() {
        store.users().seed_if_empty(demo_accounts(password, now)?).await?
    } else {
        false
    };

    info!(menu_seeded, users_seeded, "Seed complete");
    Ok(SeedReport {
        menu_seeded,
        users_seeded,
    })
}
