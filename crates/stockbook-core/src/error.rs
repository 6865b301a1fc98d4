//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── StoreError       - Persistence + transaction failures             │
//! │                                                                         │
//! │  stockbook-auth errors (separate crate)                                │
//! │  └── AuthError        - Identity + session failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → AuthError → caller/UI            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limit, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any persistence work runs; reported
/// inline to the caller and never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A product price (purchase or selling) is zero or negative.
    ///
    /// The message is part of the dashboard contract - the product form
    /// shows it verbatim.
    #[error("Prices must be greater than zero")]
    NonPositivePrice,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative (zero is fine - e.g. initial stock).
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., disallowed characters in a username).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The price message is surfaced verbatim by the product form.
    #[test]
    fn test_non_positive_price_message() {
        let err = ValidationError::NonPositivePrice;
        assert_eq!(err.to_string(), "Prices must be greater than zero");
    }

    #[test]
    fn test_field_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must not be negative");

        let err = ValidationError::TooLong {
            field: "username".to_string(),
            max: 30,
        };
        assert_eq!(err.to_string(), "username must be at most 30 characters");
    }
}
