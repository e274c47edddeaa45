//! # promo-core: Pure Pricing Logic for the Promotion Engine
//!
//! This crate prices a shopping cart by running a list of promotion rules
//! over scanned quantities and catalog unit prices. Everything here is a
//! pure function of its inputs: no I/O, no global state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Promotion Engine                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                apps/checkout-demo (driver)                      │   │
//! │  │    reads pricing.toml ──► scans items ──► prints totals         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ promo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   cart    │  │ promotion │  │ checkout  │  │   │
//! │  │   │  Product  │  │  scan()   │  │ Tier      │  │  total    │  │   │
//! │  │   │  prices   │  │  qty map  │  │ Combo     │  │ breakdown │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL CATALOG • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product identifiers and products
//! - [`money`] - Money type with checked integer arithmetic (no floating point!)
//! - [`catalog`] - Read-only unit price table
//! - [`cart`] - Scanned quantities per product
//! - [`promotion`] - The `PricingRule` trait and the two promotion kinds
//! - [`checkout`] - Cart + promotions → total
//! - [`config`] - TOML pricing configuration
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use promo_core::{Catalog, Checkout, ComboPromotion, Money, QuantityTierPromotion};
//!
//! let catalog = Catalog::from_pairs([
//!     ('A', Money::from_major(50)),
//!     ('C', Money::from_major(20)),
//!     ('D', Money::from_major(15)),
//! ])
//! .unwrap();
//!
//! let mut checkout = Checkout::new();
//! checkout.add_promotion(QuantityTierPromotion::new('A', 3, Money::from_major(130)).unwrap());
//! checkout.add_promotion(ComboPromotion::new('C', 'D', Money::from_major(30)).unwrap());
//!
//! checkout.scan('A', 3).unwrap();
//! checkout.scan_one('C').unwrap();
//! checkout.scan_one('D').unwrap();
//!
//! assert_eq!(checkout.calculate_total(&catalog).unwrap(), Money::from_major(160));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod money;
pub mod promotion;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::Catalog;
pub use checkout::{Checkout, PromotionLine, TotalBreakdown, UncoveredItems, UncoveredLine};
pub use config::PricingConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use promotion::{ComboPromotion, PricingRule, Promotion, QuantityTierPromotion};
pub use types::{Product, ProductId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in a cart.
///
/// Applies both to one scan and to the accumulated quantity, so a typo
/// like 1000 instead of 10 is caught at the till.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum length of a product identifier.
pub const MAX_PRODUCT_ID_LEN: usize = 50;
