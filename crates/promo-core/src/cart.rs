//! # Cart
//!
//! Scanned quantities per product.
//!
//! ## Invariants
//! - Every stored quantity is ≥ 1; an absent product means quantity 0
//! - Quantities only grow, through [`Cart::scan`]
//! - At most `MAX_CART_ITEMS` distinct products
//! - At most `MAX_ITEM_QUANTITY` units of one product
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scan(A, 2)                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_quantity(2), A.validate()                                     │
//! │       │                                                                 │
//! │       ├── A in cart (qty 3)? ──► 3 + 2 ≤ 999? ──► qty = 5              │
//! │       │                                                                 │
//! │       └── A not in cart ──► < 100 items? ──► insert A × 2              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::types::ProductId;
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Per-transaction map of product id to scanned quantity.
///
/// Ordered by product id so iteration (and anything priced from it) is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of a product.
    ///
    /// Repeated scans accumulate. A rejected scan leaves the cart unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::cart::Cart;
    ///
    /// let mut cart = Cart::new();
    /// cart.scan('A', 2).unwrap();
    /// cart.scan('A', 3).unwrap();
    /// assert_eq!(cart.quantity_of(&'A'.into()), 5);
    ///
    /// assert!(cart.scan('B', 0).is_err());
    /// assert_eq!(cart.quantity_of(&'B'.into()), 0);
    /// ```
    pub fn scan(&mut self, product_id: impl Into<ProductId>, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let product_id = product_id.into();
        product_id.validate()?;

        match self.items.get_mut(&product_id) {
            Some(current) => {
                let requested = u64::from(*current) + u64::from(quantity);
                if requested > u64::from(MAX_ITEM_QUANTITY) {
                    return Err(CoreError::QuantityTooLarge {
                        requested,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                *current += quantity;
            }
            None => {
                if self.items.len() >= MAX_CART_ITEMS {
                    return Err(CoreError::CartTooLarge {
                        max: MAX_CART_ITEMS,
                    });
                }
                self.items.insert(product_id, quantity);
            }
        }

        Ok(())
    }

    /// Adds a single unit.
    pub fn scan_one(&mut self, product_id: impl Into<ProductId>) -> CoreResult<()> {
        self.scan(product_id, 1)
    }

    /// Returns the scanned quantity, 0 if never scanned.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items.get(product_id).copied().unwrap_or(0)
    }

    /// Checks whether the product has been scanned.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains_key(product_id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all products.
    pub fn total_quantity(&self) -> u64 {
        self.items.values().map(|&qty| u64::from(qty)).sum()
    }

    /// Iterates `(product id, quantity)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.items.iter().map(|(id, &qty)| (id, qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
