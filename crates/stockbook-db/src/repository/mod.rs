//! # Repository Implementations
//!
//! Each repository is a thin struct over the connection pool that owns the
//! SQL for one table. Storage columns are snake_case; the row structs in
//! each module translate them into the camelCase-serializing domain types
//! from stockbook-core. No other crate ever sees the storage schema.
//!
//! ## Modules
//!
//! - [`product`] - Product CRUD + the conditional stock decrement
//! - [`sale`] - Immutable sale records
//! - [`profile`] - User profiles and username uniqueness

pub mod product;
pub mod profile;
pub mod sale;
