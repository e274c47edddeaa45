//! # Pricing Configuration
//!
//! Catalog, promotions and pricing policy as one TOML document.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority, applied by the app)       │
//! │     PROMO_UNCOVERED_ITEMS=charge_unit_price                            │
//! │                                                                         │
//! │  2. TOML Config File (read by the app, parsed here)                    │
//! │     pricing.toml                                                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     uncovered_items = "ignore", zero_below_tier_price = true           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! uncovered_items = "ignore"   # ignore | charge_unit_price
//!
//! [[products]]
//! id = "A"
//! price_cents = 5000
//!
//! [[promotions]]
//! kind = "quantity_tier"
//! product_id = "A"
//! tier_size = 3
//! tier_price = 13000
//!
//! [[promotions]]
//! kind = "combo"
//! product_a = "C"
//! product_b = "D"
//! combo_price = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::checkout::{Checkout, UncoveredItems};
use crate::error::{CoreResult, ValidationError};
use crate::promotion::{PricingRule, Promotion};
use crate::types::Product;

// =============================================================================
// Pricing Settings
// =============================================================================

/// Checkout-wide pricing behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// What to charge for units no promotion prices.
    #[serde(default)]
    pub uncovered_items: UncoveredItems,
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub products: Vec<Product>,

    /// Evaluated in file order.
    #[serde(default)]
    pub promotions: Vec<Promotion>,
}

impl PricingConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: PricingConfig = toml::from_str(contents)?;
        config.validate()?;

        info!(
            products = config.products.len(),
            promotions = config.promotions.len(),
            uncovered_items = %config.pricing.uncovered_items,
            "Pricing config loaded"
        );
        Ok(config)
    }

    /// Serializes back to TOML.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates products, duplicates and promotion parameters.
    ///
    /// Promotions may reference products outside the catalog; that only
    /// fails at calculation time, and only if the product is scanned.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = BTreeSet::new();
        for product in &self.products {
            product.validate()?;
            if !seen.insert(&product.id) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.to_string(),
                }
                .into());
            }
        }

        for promotion in &self.promotions {
            promotion.validate()?;
        }

        Ok(())
    }

    /// Builds the catalog.
    pub fn catalog(&self) -> CoreResult<Catalog> {
        Catalog::from_products(self.products.iter().cloned())
    }

    /// Returns the promotions as shareable rules, in file order.
    pub fn promotions(&self) -> Vec<Arc<dyn PricingRule>> {
        self.promotions
            .iter()
            .cloned()
            .map(|promo| Arc::new(promo) as Arc<dyn PricingRule>)
            .collect()
    }

    /// Creates an empty checkout with every configured promotion attached.
    pub fn checkout(&self) -> Checkout {
        let mut checkout = Checkout::new().with_uncovered_items(self.pricing.uncovered_items);
        for rule in self.promotions() {
            checkout.add_shared_promotion(rule);
        }
        checkout
    }

    /// Overrides the uncovered items policy (e.g. from an env var).
    pub fn override_uncovered_items(&mut self, raw: &str) -> CoreResult<()> {
        let policy: UncoveredItems = raw.parse()?;
        debug!(%policy, "Overriding uncovered items policy");
        self.pricing.uncovered_items = policy;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::ProductId;

    const REFERENCE: &str = r#"
[[products]]
id = "A"
price_cents = 5000

[[products]]
id = "B"
price_cents = 3000

[[products]]
id = "C"
price_cents = 2000

[[products]]
id = "D"
price_cents = 1500

[[promotions]]
kind = "quantity_tier"
product_id = "A"
tier_size = 3
tier_price = 13000

[[promotions]]
kind = "quantity_tier"
product_id = "B"
tier_size = 2
tier_price = 4500

[[promotions]]
kind = "combo"
product_a = "C"
product_b = "D"
combo_price = 3000
"#;

    #[test]
    fn test_parse_reference_config() {
        let config = PricingConfig::from_toml_str(REFERENCE).unwrap();
        assert_eq!(config.products.len(), 4);
        assert_eq!(config.promotions.len(), 3);
        assert_eq!(config.pricing.uncovered_items, UncoveredItems::Ignore);

        let catalog = config.catalog().unwrap();
        assert_eq!(
            catalog.unit_price_of(&ProductId::from('D')).unwrap(),
            Money::from_major(15)
        );
    }

    #[test]
    fn test_checkout_from_config() {
        let config = PricingConfig::from_toml_str(REFERENCE).unwrap();
        let catalog = config.catalog().unwrap();

        let mut checkout = config.checkout();
        assert_eq!(checkout.promotion_count(), 3);
        checkout.scan('A', 5).unwrap();
        checkout.scan('B', 5).unwrap();
        checkout.scan_one('C').unwrap();
        checkout.scan_one('D').unwrap();

        // 230 + 120 + 30
        assert_eq!(checkout.calculate_total(&catalog).unwrap(), Money::from_major(380));
    }

    #[test]
    fn test_pricing_section() {
        let doc = format!("[pricing]\nuncovered_items = \"charge_unit_price\"\n{REFERENCE}");
        let config = PricingConfig::from_toml_str(&doc).unwrap();
        assert_eq!(config.pricing.uncovered_items, UncoveredItems::ChargeUnitPrice);
        assert_eq!(
            config.checkout().uncovered_items(),
            UncoveredItems::ChargeUnitPrice
        );
    }

    #[test]
    fn test_override_uncovered_items() {
        let mut config = PricingConfig::from_toml_str(REFERENCE).unwrap();
        config.override_uncovered_items("charge").unwrap();
        assert_eq!(config.pricing.uncovered_items, UncoveredItems::ChargeUnitPrice);
        assert!(config.override_uncovered_items("bogus").is_err());
    }

    #[test]
    fn test_zero_floor_flag() {
        let doc = r#"
[[promotions]]
kind = "quantity_tier"
product_id = "A"
tier_size = 3
tier_price = 13000
zero_below_tier_price = false
"#;
        let config = PricingConfig::from_toml_str(doc).unwrap();
        match &config.promotions[0] {
            Promotion::QuantityTier(tier) => assert!(!tier.zeroes_below_tier_price()),
            other => panic!("expected tier, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_products() {
        let doc = "[[products]]\nid = \"A\"\nprice_cents = 1\n[[products]]\nid = \"A\"\nprice_cents = 2\n";
        assert!(matches!(
            PricingConfig::from_toml_str(doc),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_rejects_bad_promotions() {
        let same_pair = "[[promotions]]\nkind = \"combo\"\nproduct_a = \"C\"\nproduct_b = \"C\"\ncombo_price = 3000\n";
        assert!(PricingConfig::from_toml_str(same_pair).is_err());

        let zero_tier = "[[promotions]]\nkind = \"quantity_tier\"\nproduct_id = \"A\"\ntier_size = 0\ntier_price = 1\n";
        assert!(matches!(
            PricingConfig::from_toml_str(zero_tier),
            Err(CoreError::InvalidConfig(_))
        ));

        let unknown_kind = "[[promotions]]\nkind = \"bogof\"\nproduct_id = \"A\"\n";
        assert!(PricingConfig::from_toml_str(unknown_kind).is_err());
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let config = PricingConfig::from_toml_str(REFERENCE).unwrap();
        let text = config.to_toml_string().unwrap();
        let back = PricingConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
