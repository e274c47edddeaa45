//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing promotion subtotals in floats drifts over many carts.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 130.00 = 39000 cents, exactly                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use promo_core::money::Money;
//!
//! let tier_price = Money::from_major(130);   // $130.00
//! let unit_price = Money::from_cents(5000);  // $50.00
//!
//! let remainder = unit_price.checked_mul_quantity(2).unwrap();
//! let total = tier_price.checked_add(remainder).unwrap();
//! assert_eq!(total.cents(), 23000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative price is representable, so validation
///   can reject it instead of a parse failing
/// - **Checked arithmetic** on the pricing path: prices are unbounded above,
///   and an overflow must surface as an error, not a wrapped total
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as the bare cent count, so `tier_price = 13000`
///   in a config file means $130.00
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► remainder × unit price                           │
/// │                  │                                                      │
/// │  tier_price ─────┼──► sets × tier price ──► promotion amount ──┐       │
/// │                  │                                             │       │
/// │  combo_price ────┴──► pairs × combo price ──► promotion amount ┤       │
/// │                                                                ▼       │
/// │                                                 Checkout total (Σ)     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(50).cents(), 5000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::money::Money;
    ///
    /// let tier_price = Money::from_major(130);
    /// assert_eq!(tier_price.checked_mul_quantity(3), Some(Money::from_major(390)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$x.yy`. Debugging and demo output only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(130).cents(), 13000);
        assert_eq!(Money::from_major(-5).cents(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_major(370)), "$370.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let half = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(half.checked_mul_quantity(1), Some(half));
        assert_eq!(half.checked_mul_quantity(2), None);
        assert_eq!(half.checked_add(half), None);

        let a = Money::from_major(130);
        assert_eq!(a.checked_add(Money::from_major(100)), Some(Money::from_major(230)));
        assert_eq!(a.checked_mul_quantity(0), Some(Money::zero()));
    }

    /// Ten cents ten times is exactly one dollar, unlike 0.1f64 summed.
    #[test]
    fn test_no_float_drift() {
        let dime = Money::from_cents(10);
        let total = std::iter::repeat(dime)
            .take(10)
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
            .unwrap();
        assert_eq!(total, Money::from_major(1));
    }

    #[test]
    fn test_serde_is_bare_cents() {
        let json = serde_json::to_string(&Money::from_major(45)).unwrap();
        assert_eq!(json, "4500");

        let back: Money = serde_json::from_str("13000").unwrap();
        assert_eq!(back, Money::from_major(130));
    }
}
