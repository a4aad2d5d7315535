//! # Validation Module
//!
//! Input validation for menu items, orders and logins.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (TypeScript)                                       │
//! │  ├── Basic format checks (empty table number, no items)                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: PosApp facade (Rust)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Key-value store                                              │
//! │  └── Shape check on load (corrupt payloads reset to default)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{MenuItem, MenuItemUpdate, OrderItem};
use crate::{MAX_ITEM_QUANTITY, MAX_MENU_PRICE, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a table number.
///
/// ## Rules
/// - Must not be blank
/// - At most 20 characters
///
/// ## Returns
/// The trimmed table number.
///
/// ## Example
/// ```rust
/// use hmpos_core::validation::validate_table_number;
///
/// assert_eq!(validate_table_number(" 5 ").unwrap(), "5");
/// assert!(validate_table_number("   ").is_err());
/// ```
pub fn validate_table_number(table: &str) -> ValidationResult<String> {
    let table = table.trim();

    if table.is_empty() {
        return Err(ValidationError::required("table number"));
    }

    if table.chars().count() > 20 {
        return Err(ValidationError::TooLong {
            field: "table number".to_string(),
            max: 20,
        });
    }

    Ok(table.to_string())
}

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_menu_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a menu category. Categories are free text but not blank.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::required("category"));
    }

    Ok(())
}

/// Validates an email address just enough to catch typos on the login form.
///
/// ## Example
/// ```rust
/// use hmpos_core::validation::validate_email;
///
/// assert!(validate_email("cashier@hmpos.com").is_ok());
/// assert!(validate_email("cashier").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a menu price. Menu items are never free.
pub fn validate_menu_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if price.minor() > MAX_MENU_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: MAX_MENU_PRICE,
        });
    }

    Ok(())
}

/// Validates a line-item unit price. Zero is allowed (complimentary items).
pub fn validate_line_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.minor() > MAX_MENU_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_MENU_PRICE,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a whole menu item before it is stored.
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    validate_menu_item_name(&item.name)?;
    validate_menu_price(item.price)?;
    validate_category(&item.category)?;
    Ok(())
}

/// Validates the fields a menu update sets.
pub fn validate_menu_item_update(update: &MenuItemUpdate) -> ValidationResult<()> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate {
            entity: "menu item".to_string(),
        });
    }
    if let Some(name) = &update.name {
        validate_menu_item_name(name)?;
    }
    if let Some(price) = update.price {
        validate_menu_price(price)?;
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }
    Ok(())
}

/// Validates the line items of an order being submitted.
///
/// ## Rules
/// - At least one line, at most MAX_ORDER_LINES
/// - Each quantity in 1..=999
/// - Each unit price ≥ 0
pub fn validate_order_items(items: &[OrderItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    for item in items {
        if item.menu_item_id.trim().is_empty() {
            return Err(ValidationError::required("menu item id"));
        }
        validate_quantity(item.quantity)?;
        validate_line_price(item.price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(qty: i64, price: i64) -> OrderItem {
        let item = MenuItem::new("Cold Drink", Money::from_minor(1000), "beverages", Utc::now());
        let mut line = OrderItem::from_menu_item(&item, qty);
        line.price = Money::from_minor(price);
        line
    }

    #[test]
    fn test_validate_table_number() {
        assert_eq!(validate_table_number("12").unwrap(), "12");
        assert_eq!(validate_table_number("  A3 ").unwrap(), "A3");
        assert!(validate_table_number("").is_err());
        assert!(validate_table_number("   ").is_err());
        assert!(validate_table_number(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_prices() {
        assert!(validate_menu_price(Money::from_minor(500)).is_ok());
        assert!(validate_menu_price(Money::zero()).is_err());
        assert!(validate_menu_price(Money::from_minor(-1)).is_err());

        assert!(validate_menu_price(Money::from_minor(MAX_MENU_PRICE)).is_ok());
        assert!(validate_menu_price(Money::from_minor(MAX_MENU_PRICE + 1)).is_err());

        assert!(validate_line_price(Money::zero()).is_ok());
        assert!(validate_line_price(Money::from_minor(-1)).is_err());
        assert!(validate_line_price(Money::from_minor(i64::MAX)).is_err());
    }

    #[test]
    fn test_validate_menu_item() {
        let item = MenuItem::new("Shan Noodles", Money::from_minor(3500), "Noodles", Utc::now());
        assert!(validate_menu_item(&item).is_ok());

        let mut blank_name = item.clone();
        blank_name.name = "  ".to_string();
        assert_eq!(
            validate_menu_item(&blank_name),
            Err(ValidationError::required("name"))
        );

        let mut blank_category = item;
        blank_category.category = String::new();
        assert!(validate_menu_item(&blank_category).is_err());
    }

    #[test]
    fn test_validate_menu_item_update() {
        assert!(validate_menu_item_update(&MenuItemUpdate::default()).is_err());

        let bad_price = MenuItemUpdate {
            price: Some(Money::zero()),
            ..Default::default()
        };
        assert!(validate_menu_item_update(&bad_price).is_err());

        let ok = MenuItemUpdate {
            available: Some(false),
            ..Default::default()
        };
        assert!(validate_menu_item_update(&ok).is_ok());
    }

    #[test]
    fn test_validate_order_items() {
        assert!(validate_order_items(&[line(2, 1000)]).is_ok());
        assert!(validate_order_items(&[line(1, 0)]).is_ok());

        assert!(validate_order_items(&[]).is_err());
        assert!(validate_order_items(&[line(0, 1000)]).is_err());
        assert!(validate_order_items(&[line(1, -5)]).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@hmpos.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("@hmpos.com").is_err());
        assert!(validate_email("admin@localhost").is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(500).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
