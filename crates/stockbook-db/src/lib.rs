//! # stockbook-db: Persistence Gateway for Stockbook
//!
//! This crate provides database access and the inventory transaction
//! workflow. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  Dashboard intent (add product / record sale / view report)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │   Services   │   │   │
//! │  │   │   (pool.rs)   │   │ product/sale/  │   │ inventory    │   │   │
//! │  │   │               │◄──│ profile        │◄──│ reports      │   │   │
//! │  │   │ SqlitePool    │   │ (snake_case ⇄  │   │ (validate,   │   │   │
//! │  │   │ + migrations  │   │  domain types) │   │  transact,   │   │   │
//! │  │   └───────────────┘   └────────────────┘   │  aggregate)  │   │   │
//! │  │                                            └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                              │                  │
//! │       ▼                                              ▼                  │
//! │  SQLite file (WAL)                        stockbook-core (pure math)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (product, sale, profile)
//! - [`service`] - Inventory transactions and report orchestration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig, InventoryService, ReportService};
//!
//! let db = Database::new(DbConfig::new("path/to/stockbook.db")).await?;
//!
//! let inventory = InventoryService::new(db.clone());
//! let sale = inventory.record_sale("product-uuid", 3).await?;
//!
//! let reports = ReportService::new(db);
//! let stats = reports.dashboard_stats().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::profile::ProfileRepository;
pub use repository::sale::SaleRepository;

// Service re-exports
pub use service::{InventoryService, ReportService};
