//! # Promotions
//!
//! Pricing rules that turn cart quantities into amounts.
//!
//! ## Rule Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PricingRule (trait)                              │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │   QuantityTierPromotion      │  │      ComboPromotion          │    │
//! │  │  ──────────────────────────  │  │  ──────────────────────────  │    │
//! │  │  "3 of A for 130"            │  │  "C + D for 30"              │    │
//! │  │                              │  │                              │    │
//! │  │  sets × tier_price           │  │  min(qty C, qty D)           │    │
//! │  │   + remainder × unit price   │  │   × combo_price              │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  Promotion (enum) = config-file form of both, dispatches to the above  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are immutable and evaluation is a pure function of cart and
//! catalog, so a rule can be shared between checkouts behind an `Arc` and
//! evaluated any number of times.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::ProductId;
use crate::validation::{validate_price, validate_tier_size};

// =============================================================================
// Pricing Rule
// =============================================================================

/// A promotion that prices part of a cart.
///
/// Implementors must be pure: no interior mutability, no I/O. The checkout
/// calls [`evaluate`](PricingRule::evaluate) once per total, in
/// registration order.
pub trait PricingRule: fmt::Debug + Send + Sync {
    /// Returns the amount this rule charges for the cart.
    fn evaluate(&self, cart: &Cart, catalog: &Catalog) -> CoreResult<Money>;

    /// Returns the units this rule prices, as `(product, quantity)`.
    ///
    /// Only consulted when the checkout charges uncovered items at unit
    /// price.
    fn claimed_units(&self, cart: &Cart) -> Vec<(ProductId, u32)>;

    /// Short label for breakdown lines and logs.
    fn describe(&self) -> String;
}

// =============================================================================
// Quantity Tier
// =============================================================================

/// "Buy `tier_size` of a product for `tier_price`."
///
/// Units left over after the full tiers are charged at the catalog unit
/// price.
///
/// ## Zero Floor
/// When `zero_below_tier_price` is set (the default) and the computed
/// amount is below one `tier_price`, the rule charges nothing. With
/// A = 50 and "3 for 130", a single A is therefore free under this rule.
/// This matches the historical pricing output; turn it off with
/// [`without_zero_floor`](Self::without_zero_floor) to charge the
/// remainder normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityTierPromotion {
    product_id: ProductId,
    tier_size: NonZeroU32,
    tier_price: Money,
    #[serde(default = "default_zero_floor")]
    zero_below_tier_price: bool,
}

fn default_zero_floor() -> bool {
    true
}

impl QuantityTierPromotion {
    /// Creates a tier promotion with the zero floor enabled.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::{Money, QuantityTierPromotion};
    ///
    /// let promo = QuantityTierPromotion::new('A', 3, Money::from_major(130)).unwrap();
    /// assert_eq!(promo.tier_size(), 3);
    ///
    /// assert!(QuantityTierPromotion::new('A', 0, Money::from_major(130)).is_err());
    /// ```
    pub fn new(product_id: impl Into<ProductId>, tier_size: u32, tier_price: Money) -> CoreResult<Self> {
        let tier_size = validate_tier_size(tier_size)?;

        let promo = QuantityTierPromotion {
            product_id: product_id.into(),
            tier_size,
            tier_price,
            zero_below_tier_price: default_zero_floor(),
        };
        promo.validate()?;
        Ok(promo)
    }

    /// Charges sub-tier amounts instead of zeroing them.
    pub fn without_zero_floor(mut self) -> Self {
        self.zero_below_tier_price = false;
        self
    }

    /// Checks id format and price. Tier size is non-zero by construction.
    pub fn validate(&self) -> CoreResult<()> {
        self.product_id.validate()?;
        validate_price("tier price", self.tier_price)?;
        Ok(())
    }

    /// Returns the product this tier prices.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the number of units in one tier.
    pub fn tier_size(&self) -> u32 {
        self.tier_size.get()
    }

    /// Returns the price of one full tier.
    pub fn tier_price(&self) -> Money {
        self.tier_price
    }

    /// Checks whether sub-tier amounts are zeroed.
    pub fn zeroes_below_tier_price(&self) -> bool {
        self.zero_below_tier_price
    }
}

impl PricingRule for QuantityTierPromotion {
    fn evaluate(&self, cart: &Cart, catalog: &Catalog) -> CoreResult<Money> {
        let count = cart.quantity_of(&self.product_id);
        if count == 0 {
            return Ok(Money::zero());
        }

        let unit_price = catalog.unit_price_of(&self.product_id)?;
        let sets = count / self.tier_size.get();
        let remainder = count % self.tier_size.get();

        let amount = self
            .tier_price
            .checked_mul_quantity(sets)
            .zip(unit_price.checked_mul_quantity(remainder))
            .and_then(|(tiers, rest)| tiers.checked_add(rest))
            .ok_or_else(|| CoreError::AmountOverflow(self.describe()))?;
        if self.zero_below_tier_price && amount < self.tier_price {
            return Ok(Money::zero());
        }

        Ok(amount)
    }

    fn claimed_units(&self, cart: &Cart) -> Vec<(ProductId, u32)> {
        match cart.quantity_of(&self.product_id) {
            0 => Vec::new(),
            count => vec![(self.product_id.clone(), count)],
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} x {} for {}",
            self.tier_size, self.product_id, self.tier_price
        )
    }
}

// =============================================================================
// Combo
// =============================================================================

/// "Buy one `product_a` and one `product_b` for `combo_price`."
///
/// Charged once per matched pair; the scarcer product caps the number of
/// pairs. Unpaired units are not priced by this rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPromotion {
    product_a: ProductId,
    product_b: ProductId,
    combo_price: Money,
}

impl ComboPromotion {
    /// Creates a combo promotion over two distinct products.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::{ComboPromotion, Money};
    ///
    /// assert!(ComboPromotion::new('C', 'D', Money::from_major(30)).is_ok());
    /// assert!(ComboPromotion::new('C', 'C', Money::from_major(30)).is_err());
    /// ```
    pub fn new(
        product_a: impl Into<ProductId>,
        product_b: impl Into<ProductId>,
        combo_price: Money,
    ) -> CoreResult<Self> {
        let promo = ComboPromotion {
            product_a: product_a.into(),
            product_b: product_b.into(),
            combo_price,
        };
        promo.validate()?;
        Ok(promo)
    }

    /// Checks ids, that they differ, and the price.
    pub fn validate(&self) -> CoreResult<()> {
        self.product_a.validate()?;
        self.product_b.validate()?;
        if self.product_a == self.product_b {
            return Err(ValidationError::InvalidFormat {
                field: "combo".to_string(),
                reason: format!("needs two distinct products, got {} twice", self.product_a),
            }
            .into());
        }
        validate_price("combo price", self.combo_price)?;
        Ok(())
    }

    /// Returns both products, in the order they were given.
    pub fn products(&self) -> (&ProductId, &ProductId) {
        (&self.product_a, &self.product_b)
    }

    /// Returns the price of one matched pair.
    pub fn combo_price(&self) -> Money {
        self.combo_price
    }

    fn pairs(&self, cart: &Cart) -> u32 {
        cart.quantity_of(&self.product_a)
            .min(cart.quantity_of(&self.product_b))
    }
}

impl PricingRule for ComboPromotion {
    fn evaluate(&self, cart: &Cart, _catalog: &Catalog) -> CoreResult<Money> {
        // Either side absent means zero pairs.
        self.combo_price
            .checked_mul_quantity(self.pairs(cart))
            .ok_or_else(|| CoreError::AmountOverflow(self.describe()))
    }

    fn claimed_units(&self, cart: &Cart) -> Vec<(ProductId, u32)> {
        match self.pairs(cart) {
            0 => Vec::new(),
            pairs => vec![
                (self.product_a.clone(), pairs),
                (self.product_b.clone(), pairs),
            ],
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} + {} for {}",
            self.product_a, self.product_b, self.combo_price
        )
    }
}

// =============================================================================
// Promotion (config form)
// =============================================================================

/// Either promotion kind, as written in a pricing config file.
///
/// ```toml
/// [[promotions]]
/// kind = "quantity_tier"
/// product_id = "A"
/// tier_size = 3
/// tier_price = 13000
///
/// [[promotions]]
/// kind = "combo"
/// product_a = "C"
/// product_b = "D"
/// combo_price = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Promotion {
    QuantityTier(QuantityTierPromotion),
    Combo(ComboPromotion),
}

impl Promotion {
    /// Re-checks a deserialized promotion.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Promotion::QuantityTier(promo) => promo.validate(),
            Promotion::Combo(promo) => promo.validate(),
        }
    }
}

impl PricingRule for Promotion {
    fn evaluate(&self, cart: &Cart, catalog: &Catalog) -> CoreResult<Money> {
        match self {
            Promotion::QuantityTier(promo) => promo.evaluate(cart, catalog),
            Promotion::Combo(promo) => promo.evaluate(cart, catalog),
        }
    }

    fn claimed_units(&self, cart: &Cart) -> Vec<(ProductId, u32)> {
        match self {
            Promotion::QuantityTier(promo) => promo.claimed_units(cart),
            Promotion::Combo(promo) => promo.claimed_units(cart),
        }
    }

    fn describe(&self) -> String {
        match self {
            Promotion::QuantityTier(promo) => promo.describe(),
            Promotion::Combo(promo) => promo.describe(),
        }
    }
}

impl From<QuantityTierPromotion> for Promotion {
    fn from(promo: QuantityTierPromotion) -> Self {
        Promotion::QuantityTier(promo)
    }
}

impl From<ComboPromotion> for Promotion {
    fn from(promo: ComboPromotion) -> Self {
        Promotion::Combo(promo)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
