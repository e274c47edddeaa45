//! # Domain Types
//!
//! Product identifiers and products.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐         ┌─────────────────┐                       │
//! │  │   ProductId     │         │    Product      │                       │
//! │  │  ─────────────  │ ◄────── │  ─────────────  │                       │
//! │  │  "A", "COKE-1"  │         │  id             │                       │
//! │  │  Ord + Hash     │         │  price (Money)  │                       │
//! │  └─────────────────┘         └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable once built. A price change means a new
//! [`Catalog`](crate::catalog::Catalog), not a mutated product.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_price, validate_product_id};

// =============================================================================
// Product Id
// =============================================================================

/// Business identifier of a product.
///
/// The reference data uses single letters (`'A'`..`'D'`), so `From<char>`
/// is provided alongside `From<&str>`. Construction through `From` does not
/// validate; use [`ProductId::parse`] for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parses and validates a product id.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::types::ProductId;
    ///
    /// assert_eq!(ProductId::parse(" A ").unwrap().as_str(), "A");
    /// assert!(ProductId::parse("").is_err());
    /// assert!(ProductId::parse("has space").is_err());
    /// ```
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        validate_product_id(trimmed)?;
        Ok(ProductId(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-checks an id that was built without validation.
    pub fn validate(&self) -> CoreResult<()> {
        validate_product_id(&self.0).map_err(CoreError::from)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<char> for ProductId {
    fn from(c: char) -> Self {
        ProductId(c.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId(s)
    }
}

impl From<&ProductId> for ProductId {
    fn from(id: &ProductId) -> Self {
        id.clone()
    }
}

impl FromStr for ProductId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductId::parse(s)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product the catalog can price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Business identifier.
    pub id: ProductId,

    /// Unit price. Stored in config files as `price_cents`.
    #[serde(rename = "price_cents")]
    pub price: Money,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::{Money, Product};
    ///
    /// let product = Product::new('A', Money::from_major(50)).unwrap();
    /// assert_eq!(product.id.as_str(), "A");
    ///
    /// assert!(Product::new('B', Money::from_cents(-1)).is_err());
    /// ```
    pub fn new(id: impl Into<ProductId>, price: Money) -> CoreResult<Self> {
        let product = Product {
            id: id.into(),
            price,
        };
        product.validate()?;
        Ok(product)
    }

    /// Checks id format and that the price is not negative.
    pub fn validate(&self) -> CoreResult<()> {
        self.id.validate()?;
        validate_price("price", self.price)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
