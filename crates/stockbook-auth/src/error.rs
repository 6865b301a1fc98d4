//! # Auth Error Types
//!
//! Errors surfaced by the identity adapter. Display strings on the
//! user-facing variants are stable: the dashboard matches on them.

use stockbook_core::ValidationError;
use stockbook_db::StoreError;
use thiserror::Error;

/// Errors from the identity adapter and session lifecycle.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username already claimed by another profile.
    #[error("Username '{username}' is already taken")]
    DuplicateUsername { username: String },

    /// Sign-in attempted with a username no profile has.
    ///
    /// The display string is load-bearing: the dashboard shows it verbatim.
    #[error("Username not found")]
    UsernameNotFound,

    /// The identity provider rejected the email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An operation that needs a session was called without one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Registration attempted with an email the provider already knows.
    #[error("Email '{email}' is already registered")]
    EmailTaken { email: String },

    /// Token generation or validation failed.
    #[error("Token error: {0}")]
    Token(String),

    /// Password hashing or verification machinery failed.
    #[error("Credential processing failed: {0}")]
    Credential(String),

    /// Input validation failure (username format etc.).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience result alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_not_found_display_is_exact() {
        assert_eq!(AuthError::UsernameNotFound.to_string(), "Username not found");
    }

    #[test]
    fn test_store_error_passes_through() {
        let err = AuthError::from(StoreError::InsufficientStock);
        assert_eq!(err.to_string(), "Insufficient stock");
    }
}
