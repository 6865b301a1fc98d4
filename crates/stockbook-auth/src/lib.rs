//! # stockbook-auth: Identity Adapter for Stockbook
//!
//! Users know their username; identity providers know emails. This crate
//! bridges the two and owns the process-wide session state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockbook Identity Flow                            │
//! │                                                                         │
//! │  Dashboard (sign up / sign in / edit profile)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockbook-auth (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐        ┌──────────────────────────────┐     │   │
//! │  │   │ AuthContext  │───────►│ AuthProvider (trait)         │     │   │
//! │  │   │ username ⇄   │        │  └── LocalAuthProvider       │     │   │
//! │  │   │ email, flows,│◄───────│      argon2id + JWT over     │     │   │
//! │  │   │ session slot │ events │      the accounts table      │     │   │
//! │  │   └──────┬───────┘        └──────────────┬───────────────┘     │   │
//! │  └──────────┼───────────────────────────────┼─────────────────────┘   │
//! │             ▼                               ▼                          │
//! │     profiles table                   accounts table                    │
//! │        (stockbook-db, same SQLite database)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`provider`] - The provider seam: [`AuthProvider`], [`Session`], events
//! - [`local`] - In-tree provider over the local accounts table
//! - [`context`] - [`AuthContext`]: flows and session tracking
//! - [`config`] - Secret and session lifetime from the environment
//! - [`error`] - Auth error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockbook_auth::{AuthConfig, AuthContext, LocalAuthProvider};
//!
//! let provider = Arc::new(LocalAuthProvider::new(&db, AuthConfig::load()));
//! let auth = AuthContext::init(provider, db.profiles()).await?;
//!
//! auth.sign_in("amira", "hunter2!").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod context;
pub mod error;
pub mod local;
pub mod provider;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AuthConfig;
pub use context::{AuthContext, SignUpRequest};
pub use error::{AuthError, AuthResult};
pub use local::LocalAuthProvider;
pub use provider::{AuthProvider, Session, SessionEvent};
