//! # Catalog
//!
//! The read-only unit price table.
//!
//! A catalog is built once by the caller and passed by reference to
//! [`Checkout::calculate_total`](crate::checkout::Checkout::calculate_total).
//! Checkouts never store it, so a new catalog can be swapped in between
//! calculations without touching open checkouts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, ProductId};

/// Products keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from products, rejecting duplicates and bad prices.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> CoreResult<Self> {
        let mut catalog = Catalog::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Builds a catalog from `(id, price)` pairs.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::{Catalog, Money};
    ///
    /// let catalog = Catalog::from_pairs([
    ///     ('A', Money::from_major(50)),
    ///     ('B', Money::from_major(30)),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(catalog.len(), 2);
    /// assert!(Catalog::from_pairs([('A', Money::zero()), ('A', Money::zero())]).is_err());
    /// ```
    pub fn from_pairs<I, P>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (P, Money)>,
        P: Into<ProductId>,
    {
        let mut catalog = Catalog::new();
        for (id, price) in pairs {
            catalog.insert(Product::new(id, price)?)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, product: Product) -> CoreResult<()> {
        product.validate()?;
        if self.products.contains_key(&product.id) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id.to_string(),
            }
            .into());
        }
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Looks up a unit price.
    ///
    /// A missing product is a configuration error: some rule refers to a
    /// product nobody priced.
    pub fn unit_price_of(&self, id: &ProductId) -> CoreResult<Money> {
        match self.products.get(id) {
            Some(product) => Ok(product.price),
            None => {
                warn!(product_id = %id, "Product missing from catalog");
                Err(CoreError::ProductNotFound(id.to_string()))
            }
        }
    }

    /// Returns the product with the given id, if any.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Checks whether the catalog prices this product.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains_key(id)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterates products in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

impl TryFrom<Vec<Product>> for Catalog {
    type Error = CoreError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        Catalog::from_products(products)
    }
}

impl From<Catalog> for Vec<Product> {
    fn from(catalog: Catalog) -> Self {
        catalog.products.into_values().collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
