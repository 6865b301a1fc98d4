//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockbook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard Frontend (web)                       │   │
//! │  │    Products UI ──► Sales UI ──► Reports UI ──► Profile UI      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ camelCase JSON (ts-rs bindings)        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        stockbook-db (gateway + transactions)                    │   │
//! │  │        stockbook-auth (identity + session)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ dashboard │  │   rules   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │ daily/hr  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Category, Profile)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`report`] - Aggregation engine (dashboard stats, daily/hourly, top sellers)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Clock Reads**: "now" and the timezone are parameters, never `Utc::now()`
//! 4. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use stockbook_core::report::dashboard_stats;
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
//!
//! // Empty shop: all-zero stats, no errors
//! let stats = dashboard_stats(&[], &[], now);
//! assert_eq!(stats.total_products, 0);
//! assert!(stats.total_sales.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Money` instead of
// `use stockbook_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use report::{
    CategorySales, DailySalesSummary, DashboardStats, HourlySalesSlot, SalesWindow, TopProduct,
    DEFAULT_TOP_PRODUCTS_LIMIT,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name.
///
/// ## Business Reason
/// Keeps list views and receipts renderable; anything longer is almost
/// certainly a paste accident.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a username.
///
/// ## Business Reason
/// Usernames appear in the header and on report exports; 30 characters
/// matches what the profile form accepts.
pub const MAX_USERNAME_LEN: usize = 30;
