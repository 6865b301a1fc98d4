//! # Validation Module
//!
//! Input validation utilities for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (Rust)                                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (profiles.username)                            │
//! │  └── CHECK constraints (quantity >= 0)                                 │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::money::Money;
//! use stockbook_core::validation::{validate_prices, validate_product_name};
//!
//! // Validate before the gateway is ever called
//! validate_product_name("Oat Milk 1L").unwrap();
//! validate_prices(Money::from_cents(500), Money::from_cents(800)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_PRODUCT_NAME_LEN, MAX_USERNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Price Validators
// =============================================================================

/// Validates a product's price pair.
///
/// ## Rules
/// - Both `purchase_price` and `selling_price` must be > 0
/// - No ordering is enforced between them: selling below cost is allowed
///   and simply yields negative profit on sales
///
/// ## Product Form Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Add Product                                                            │
/// │                                                                         │
/// │  User enters purchase $5.00, selling $8.00                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_prices(500¢, 800¢) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── either ≤ 0? → "Prices must be greater than zero"             │
/// │       │                                                                 │
/// │       └── OK → Proceed with create_product                             │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_prices(purchase_price: Money, selling_price: Money) -> ValidationResult<()> {
    if !purchase_price.is_positive() || !selling_price.is_positive() {
        return Err(ValidationError::NonPositivePrice);
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Oat Milk 1L").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 30 characters
/// - Only letters, numbers, and underscores
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_username;
///
/// assert!(validate_username("shop_owner1").is_ok());
/// assert!(validate_username("has space").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an initial/updated stock quantity.
///
/// ## Rules
/// - Must not be negative
/// - Zero is allowed (out-of-stock product)
///
/// Sale quantities are NOT validated here: the transaction service treats a
/// non-positive or oversized sale quantity as insufficient stock, which is a
/// business-rule rejection rather than an input-shape failure.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
