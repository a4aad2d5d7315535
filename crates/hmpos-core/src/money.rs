//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Kyat prices are whole numbers (1000 Ks, 4500 Ks), so one minor      │
//! │    unit is one Kyat. Other currencies store their smallest unit.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hmpos_core::money::Money;
//!
//! let price = Money::from_minor(4500);
//! let line = price * 2;
//! assert_eq!(line.minor(), 9000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serializes as a bare integer, so stored orders read `"total": 2500`.
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► OrderItem.price (frozen) ──► OrderItem line total
///                                                        │
///                                   Order.total ◄────────┘
///                                        │
///                       Reports: revenue, average, breakdowns
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use hmpos_core::money::Money;
    ///
    /// let price = Money::from_minor(3000); // 3,000 Ks
    /// assert_eq!(price.minor(), 3000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use hmpos_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(1000);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Splits the amount evenly across `count` parts, truncating toward zero.
    ///
    /// Returns zero when `count` is zero, which is what the sales report wants
    /// for an average over no paid orders.
    ///
    /// ## Example
    /// ```rust
    /// use hmpos_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(7000).divide(2).minor(), 3500);
    /// assert_eq!(Money::from_minor(7000).divide(0).minor(), 0);
    /// ```
    pub const fn divide(&self, count: usize) -> Self {
        if count == 0 {
            Money(0)
        } else {
            Money(self.0 / count as i64)
        }
    }

    /// Calculates tax at the given rate.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half up.
    ///
    /// ## Example
    /// ```rust
    /// use hmpos_core::money::Money;
    /// use hmpos_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(4500);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500)); // 5%
    /// assert_eq!(tax.minor(), 225);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large totals from overflowing
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax as i64)
    }

    /// Formats the amount with thousands separators and a currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use hmpos_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(12500).format_with("Ks"), "12,500 Ks");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        if symbol.is_empty() {
            format!("{}{}", sign, grouped)
        } else {
            format!("{}{} {}", sign, grouped, symbol)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the grouped amount without a currency symbol.
///
/// ## Note
/// Use [`Money::format_with`] with the configured symbol for receipts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(""))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition saturates instead of wrapping; validated orders never get close.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(4500);
        assert_eq!(money.minor(), 4500);
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_minor(0).format_with("Ks"), "0 Ks");
        assert_eq!(Money::from_minor(500).format_with("Ks"), "500 Ks");
        assert_eq!(Money::from_minor(1000).format_with("Ks"), "1,000 Ks");
        assert_eq!(Money::from_minor(1234567).format_with("Ks"), "1,234,567 Ks");
        assert_eq!(Money::from_minor(-4500).format_with("Ks"), "-4,500 Ks");
        assert_eq!(format!("{}", Money::from_minor(25000)), "25,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_minor(200);
        assert_eq!(c.minor(), 1300);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_minor(2000), Money::from_minor(500)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.minor(), 2500);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let huge = Money::from_minor(i64::MAX / 2);
        assert_eq!((huge * 3).minor(), i64::MAX);
        assert_eq!((huge + huge + huge).minor(), i64::MAX);

        let total: Money = [huge, huge, huge].iter().sum();
        assert_eq!(total.minor(), i64::MAX);
    }

    #[test]
    fn test_divide_truncates_and_guards_zero() {
        assert_eq!(Money::from_minor(7000).divide(2).minor(), 3500);
        assert_eq!(Money::from_minor(1000).divide(3).minor(), 333);
        assert_eq!(Money::from_minor(1000).divide(0).minor(), 0);
    }

    #[test]
    fn test_tax_calculation() {
        let amount = Money::from_minor(1000);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(1000)).minor(), 100);
        // 1005 * 5% = 50.25 → 50
        assert_eq!(Money::from_minor(1005).calculate_tax(TaxRate::from_bps(500)).minor(), 50);
        assert!(amount.calculate_tax(TaxRate::zero()).is_zero());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(2500)).unwrap();
        assert_eq!(json, "2500");
        let back: Money = serde_json::from_str("4500").unwrap();
        assert_eq!(back, Money::from_minor(4500));
    }
}
