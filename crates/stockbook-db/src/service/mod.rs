//! # Gateway Services
//!
//! The operations the dashboard calls, orchestrating validation, the
//! repositories, and the pure aggregation engine.
//!
//! - [`inventory`] - product CRUD and the sale transaction
//! - [`reports`] - fetch-then-aggregate report operations

pub mod inventory;
pub mod reports;

pub use inventory::InventoryService;
pub use reports::ReportService;
