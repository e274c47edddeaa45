//! # Error Types
//!
//! Domain-specific error types for promo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  promo-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing and configuration errors               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  checkout-demo (app)                                                   │
//! │  └── anyhow::Error    - Wraps CoreError at the process boundary        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → anyhow → stderr                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are transient. Every error is a setup bug or bad input,
//! so nothing here is retried.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    ///
    /// ## When This Occurs
    /// - A tier promotion references a product the catalog doesn't price
    /// - An uncovered item has to be charged but has no catalog entry
    ///
    /// Either way the pricing setup is broken, so the calculation aborts.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart has exceeded maximum allowed distinct products.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Accumulated quantity of one product exceeds the maximum.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart holds A × 990
    ///      │
    ///      ▼
    /// scan(A, 20)
    ///      │
    ///      ▼
    /// QuantityTooLarge { requested: 1010, max: 999 }
    ///      │
    ///      ▼
    /// Cart is unchanged, still A × 990
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u64, max: u32 },

    /// Pricing configuration could not be parsed or is inconsistent.
    #[error("Invalid pricing config: {0}")]
    InvalidConfig(String),

    /// An amount does not fit in `i64` cents.
    ///
    /// Prices are only bounded below, so a config with huge prices can
    /// validate and still fail here once quantities multiply them.
    #[error("Amount overflow while pricing {0}")]
    AmountOverflow(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::InvalidConfig(err.to_string())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::InvalidConfig(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state changes: a rejected scan or constructor leaves
/// everything as it was.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a product id with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. the same product id twice in a catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
