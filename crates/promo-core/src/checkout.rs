//! # Checkout
//!
//! One customer transaction: a cart plus the promotions that price it.
//!
//! ## Total Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     calculate_breakdown(&catalog)                       │
//! │                                                                         │
//! │  for rule in promotions (registration order):                          │
//! │      amount = rule.evaluate(cart, catalog)?   ──► PromotionLine        │
//! │      total += amount                                                   │
//! │                                                                         │
//! │  UncoveredItems::Ignore          → done                                │
//! │  UncoveredItems::ChargeUnitPrice → for each cart product:              │
//! │      left = qty - Σ claimed units                                      │
//! │      total += left × unit price               ──► UncoveredLine        │
//! │                                                                         │
//! │  First error aborts: a broken rule never yields a partial total.       │
//! │  Arithmetic is checked; overflow is CoreError::AmountOverflow.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With the default `Ignore` policy a product no promotion prices adds
//! nothing to the total. That is the historical behavior and stays the
//! default; `ChargeUnitPrice` is opt-in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::promotion::PricingRule;
use crate::types::ProductId;

// =============================================================================
// Uncovered Items Policy
// =============================================================================

/// What to charge for cart units no promotion prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncoveredItems {
    /// Uncovered units cost nothing.
    #[default]
    Ignore,

    /// Uncovered units are charged at catalog unit price.
    ChargeUnitPrice,
}

impl fmt::Display for UncoveredItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UncoveredItems::Ignore => write!(f, "ignore"),
            UncoveredItems::ChargeUnitPrice => write!(f, "charge_unit_price"),
        }
    }
}

impl FromStr for UncoveredItems {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(UncoveredItems::Ignore),
            "charge_unit_price" | "charge" | "full_price" => Ok(UncoveredItems::ChargeUnitPrice),
            other => Err(CoreError::InvalidConfig(format!(
                "Unknown uncovered items policy: '{}'. Valid options: ignore, charge_unit_price",
                other
            ))),
        }
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Amount one promotion contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionLine {
    pub description: String,
    pub amount: Money,
}

/// Units charged at unit price because no promotion priced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncoveredLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub amount: Money,
}

/// Itemised result of a total calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalBreakdown {
    /// One line per promotion, in registration order.
    pub promotions: Vec<PromotionLine>,
    /// Uncovered charges in product id order. Empty under `Ignore`.
    pub uncovered: Vec<UncoveredLine>,
    pub total: Money,
}

// =============================================================================
// Checkout
// =============================================================================

/// A cart and the ordered promotions that price it.
///
/// The catalog is passed to each calculation rather than stored, so
/// prices can change between calculations without rebuilding checkouts.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    cart: Cart,
    promotions: Vec<Arc<dyn PricingRule>>,
    uncovered: UncoveredItems,
}

impl Checkout {
    /// Creates an empty checkout with the `Ignore` policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uncovered items policy.
    pub fn with_uncovered_items(mut self, policy: UncoveredItems) -> Self {
        self.uncovered = policy;
        self
    }

    /// Appends a promotion. Registration order is evaluation order.
    pub fn add_promotion(&mut self, rule: impl PricingRule + 'static) {
        self.promotions.push(Arc::new(rule));
    }

    /// Appends a promotion shared with other checkouts.
    pub fn add_shared_promotion(&mut self, rule: Arc<dyn PricingRule>) {
        self.promotions.push(rule);
    }

    /// Scans `quantity` units into the cart.
    pub fn scan(&mut self, product_id: impl Into<ProductId>, quantity: u32) -> CoreResult<()> {
        self.cart.scan(product_id, quantity)
    }

    /// Scans a single unit into the cart.
    pub fn scan_one(&mut self, product_id: impl Into<ProductId>) -> CoreResult<()> {
        self.cart.scan_one(product_id)
    }

    /// Returns the scanned cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the number of registered promotions.
    pub fn promotion_count(&self) -> usize {
        self.promotions.len()
    }

    /// Returns the uncovered items policy.
    pub fn uncovered_items(&self) -> UncoveredItems {
        self.uncovered
    }

    /// Computes the total.
    ///
    /// ## Example
    /// ```rust
    /// use promo_core::{Catalog, Checkout, Money, QuantityTierPromotion};
    ///
    /// let catalog = Catalog::from_pairs([('B', Money::from_major(30))]).unwrap();
    ///
    /// let mut checkout = Checkout::new();
    /// checkout.add_promotion(QuantityTierPromotion::new('B', 2, Money::from_major(45)).unwrap());
    /// checkout.scan('B', 5).unwrap();
    ///
    /// // 2 × 45 + 1 × 30
    /// assert_eq!(checkout.calculate_total(&catalog).unwrap(), Money::from_major(120));
    /// ```
    pub fn calculate_total(&self, catalog: &Catalog) -> CoreResult<Money> {
        Ok(self.calculate_breakdown(catalog)?.total)
    }

    /// Computes the total with one line per promotion and uncovered product.
    pub fn calculate_breakdown(&self, catalog: &Catalog) -> CoreResult<TotalBreakdown> {
        let mut total = Money::zero();
        let mut promotions = Vec::with_capacity(self.promotions.len());

        for rule in &self.promotions {
            let amount = rule.evaluate(&self.cart, catalog)?;
            let description = rule.describe();
            debug!(promotion = %description, %amount, "Promotion evaluated");

            total = total
                .checked_add(amount)
                .ok_or_else(|| CoreError::AmountOverflow("checkout total".to_string()))?;
            promotions.push(PromotionLine {
                description,
                amount,
            });
        }

        let uncovered = match self.uncovered {
            UncoveredItems::Ignore => Vec::new(),
            UncoveredItems::ChargeUnitPrice => self.uncovered_lines(catalog)?,
        };
        for line in &uncovered {
            total = total
                .checked_add(line.amount)
                .ok_or_else(|| CoreError::AmountOverflow("checkout total".to_string()))?;
        }

        debug!(
            %total,
            promotions = promotions.len(),
            uncovered = uncovered.len(),
            "Checkout total calculated"
        );

        Ok(TotalBreakdown {
            promotions,
            uncovered,
            total,
        })
    }

    fn uncovered_lines(&self, catalog: &Catalog) -> CoreResult<Vec<UncoveredLine>> {
        let mut claimed: BTreeMap<ProductId, u32> = BTreeMap::new();
        for rule in &self.promotions {
            for (product_id, qty) in rule.claimed_units(&self.cart) {
                let entry = claimed.entry(product_id).or_insert(0);
                *entry = entry.saturating_add(qty);
            }
        }

        let mut lines = Vec::new();
        for (product_id, qty) in self.cart.iter() {
            let left = qty.saturating_sub(claimed.get(product_id).copied().unwrap_or(0));
            if left == 0 {
                continue;
            }

            let amount = catalog
                .unit_price_of(product_id)?
                .checked_mul_quantity(left)
                .ok_or_else(|| CoreError::AmountOverflow(format!("{left} x {product_id}")))?;
            debug!(product_id = %product_id, quantity = left, %amount, "Uncovered units charged");
            lines.push(UncoveredLine {
                product_id: product_id.clone(),
                quantity: left,
                amount,
            });
        }

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotion::{ComboPromotion, QuantityTierPromotion};

    fn catalog() -> Catalog {
        Catalog::from_pairs([
            ('A', Money::from_major(50)),
            ('B', Money::from_major(30)),
            ('C', Money::from_major(20)),
            ('D', Money::from_major(15)),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_promotions_is_zero() {
        let mut checkout = Checkout::new();
        checkout.scan('A', 7).unwrap();
        checkout.scan('D', 2).unwrap();
        assert_eq!(checkout.calculate_total(&catalog()).unwrap(), Money::zero());

        assert_eq!(Checkout::new().calculate_total(&catalog()).unwrap(), Money::zero());
    }

    #[test]
    fn test_sums_in_registration_order() {
        let mut checkout = Checkout::new();
        checkout.add_promotion(ComboPromotion::new('C', 'D', Money::from_major(30)).unwrap());
        checkout.add_promotion(QuantityTierPromotion::new('A', 3, Money::from_major(130)).unwrap());
        checkout.scan('A', 3).unwrap();
        checkout.scan_one('C').unwrap();
        checkout.scan_one('D').unwrap();

        let breakdown = checkout.calculate_breakdown(&catalog()).unwrap();
        let descriptions: Vec<&str> = breakdown
            .promotions
            .iter()
            .map(|line| line.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["C + D for $30.00", "3 x A for $130.00"]);
        assert_eq!(breakdown.total, Money::from_major(160));
        assert!(breakdown.uncovered.is_empty());
    }

    #[test]
    fn test_error_aborts_calculation() {
        let mut checkout = Checkout::new();
        checkout.add_promotion(QuantityTierPromotion::new('Z', 2, Money::from_major(10)).unwrap());
        checkout.scan_one('Z').unwrap();

        let err = checkout.calculate_total(&catalog()).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_charge_unit_price_for_unclaimed_units() {
        let mut checkout = Checkout::new().with_uncovered_items(UncoveredItems::ChargeUnitPrice);
        checkout.add_promotion(ComboPromotion::new('C', 'D', Money::from_major(30)).unwrap());
        checkout.scan('C', 3).unwrap();
        checkout.scan_one('D').unwrap();
        checkout.scan('B', 2).unwrap();

        let breakdown = checkout.calculate_breakdown(&catalog()).unwrap();
        // 1 pair (30) + B × 2 (60) + leftover C × 2 (40)
        assert_eq!(
            breakdown.uncovered,
            vec![
                UncoveredLine {
                    product_id: ProductId::from('B'),
                    quantity: 2,
                    amount: Money::from_major(60),
                },
                UncoveredLine {
                    product_id: ProductId::from('C'),
                    quantity: 2,
                    amount: Money::from_major(40),
                },
            ]
        );
        assert_eq!(breakdown.total, Money::from_major(130));
    }

    #[test]
    fn test_tier_claims_whole_quantity() {
        let mut checkout = Checkout::new().with_uncovered_items(UncoveredItems::ChargeUnitPrice);
        checkout.add_promotion(QuantityTierPromotion::new('A', 3, Money::from_major(130)).unwrap());
        checkout.scan('A', 4).unwrap();

        // Remainder is priced by the tier rule itself, never twice.
        let breakdown = checkout.calculate_breakdown(&catalog()).unwrap();
        assert!(breakdown.uncovered.is_empty());
        assert_eq!(breakdown.total, Money::from_major(180));
    }

    #[test]
    fn test_uncovered_product_missing_from_catalog() {
        let mut checkout = Checkout::new().with_uncovered_items(UncoveredItems::ChargeUnitPrice);
        checkout.scan_one('Q').unwrap();
        assert!(matches!(
            checkout.calculate_total(&catalog()),
            Err(CoreError::ProductNotFound(_))
        ));

        // Under Ignore the same cart prices fine.
        let mut checkout = Checkout::new();
        checkout.scan_one('Q').unwrap();
        assert_eq!(checkout.calculate_total(&catalog()).unwrap(), Money::zero());
    }

    #[test]
    fn test_shared_promotion_across_checkouts() {
        let tier: Arc<dyn PricingRule> =
            Arc::new(QuantityTierPromotion::new('B', 2, Money::from_major(45)).unwrap());

        let mut first = Checkout::new();
        first.add_shared_promotion(Arc::clone(&tier));
        first.scan('B', 2).unwrap();

        let mut second = Checkout::new();
        second.add_shared_promotion(tier);
        second.scan('B', 4).unwrap();

        assert_eq!(first.calculate_total(&catalog()).unwrap(), Money::from_major(45));
        assert_eq!(second.calculate_total(&catalog()).unwrap(), Money::from_major(90));
    }

    #[test]
    fn test_catalog_swapped_between_calculations() {
        let mut checkout = Checkout::new();
        checkout.add_promotion(
            QuantityTierPromotion::new('A', 3, Money::from_major(130))
                .unwrap()
                .without_zero_floor(),
        );
        checkout.scan('A', 4).unwrap();
        assert_eq!(checkout.calculate_total(&catalog()).unwrap(), Money::from_major(180));

        let repriced = Catalog::from_pairs([('A', Money::from_major(60))]).unwrap();
        assert_eq!(checkout.calculate_total(&repriced).unwrap(), Money::from_major(190));
    }

    #[test]
    fn test_running_total_overflow_is_an_error() {
        let half = Money::from_cents(i64::MAX / 2 + 1);
        let mut checkout = Checkout::new();
        checkout.add_promotion(ComboPromotion::new('C', 'D', half).unwrap());
        checkout.add_promotion(ComboPromotion::new('A', 'B', half).unwrap());
        checkout.scan_one('A').unwrap();
        checkout.scan_one('B').unwrap();
        checkout.scan_one('C').unwrap();
        checkout.scan_one('D').unwrap();

        // Each promotion fits on its own; their sum does not.
        let err = checkout.calculate_total(&catalog()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
    }

    #[test]
    fn test_tier_overflow_aborts_total() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        let mut checkout = Checkout::new();
        checkout.add_promotion(QuantityTierPromotion::new('A', 1, huge).unwrap());
        checkout.scan('A', 2).unwrap();

        assert!(matches!(
            checkout.calculate_total(&catalog()),
            Err(CoreError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_uncovered_charge_overflow_is_an_error() {
        let catalog = Catalog::from_pairs([
            ('A', Money::from_major(50)),
            ('X', Money::from_cents(i64::MAX)),
        ])
        .unwrap();

        let mut checkout = Checkout::new().with_uncovered_items(UncoveredItems::ChargeUnitPrice);
        checkout.scan('X', 2).unwrap();
        assert!(matches!(
            checkout.calculate_total(&catalog),
            Err(CoreError::AmountOverflow(_))
        ));

        // One X fits, but adding an uncovered A on top does not.
        let mut checkout = Checkout::new().with_uncovered_items(UncoveredItems::ChargeUnitPrice);
        checkout.scan_one('A').unwrap();
        checkout.scan_one('X').unwrap();
        assert!(matches!(
            checkout.calculate_total(&catalog),
            Err(CoreError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_invalid_ids_never_reach_the_cart() {
        let mut checkout = Checkout::new();
        assert!(checkout.scan("", 1).is_err());
        assert!(checkout.scan("has space", 1).is_err());
        assert!(checkout.cart().is_empty());
    }

    #[test]
    fn test_uncovered_policy_parse() {
        assert_eq!("ignore".parse::<UncoveredItems>().unwrap(), UncoveredItems::Ignore);
        assert_eq!(
            "Charge_Unit_Price".parse::<UncoveredItems>().unwrap(),
            UncoveredItems::ChargeUnitPrice
        );
        assert_eq!(
            "full_price".parse::<UncoveredItems>().unwrap(),
            UncoveredItems::ChargeUnitPrice
        );
        assert!("sometimes".parse::<UncoveredItems>().is_err());
        assert_eq!(UncoveredItems::ChargeUnitPrice.to_string(), "charge_unit_price");
    }
}
