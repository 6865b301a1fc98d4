//! # Identity Provider Seam
//!
//! The trait the session layer is written against. The in-tree
//! implementation is [`crate::local::LocalAuthProvider`]; a hosted identity
//! service would slot in behind the same trait.
//!
//! Providers speak email+password. Username handling lives a layer up, in
//! [`crate::context::AuthContext`], which resolves usernames to account
//! emails before calling in here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::error::AuthResult;

/// An authenticated session issued by a provider.
#[derive(Debug, Clone)]
pub struct Session {
    /// Account id of the signed-in user.
    pub user_id: String,

    /// Email the account was registered under.
    pub email: String,

    /// Bearer token for the session.
    pub access_token: String,

    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session's token has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Session lifecycle changes pushed to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session was established.
    SignedIn(Session),

    /// The session ended.
    SignedOut,
}

/// The identity provider seam.
///
/// All methods are single-attempt; callers decide what to do on failure.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates a new account and returns its session.
    ///
    /// ## Returns
    /// * `Err(AuthError::EmailTaken)` - the email is already registered
    async fn register(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Exchanges email+password for a session.
    ///
    /// ## Returns
    /// * `Err(AuthError::InvalidCredentials)` - unknown email or wrong
    ///   password (indistinguishable on purpose)
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Ends the current session.
    async fn sign_out(&self) -> AuthResult<()>;

    /// The provider's current session, if one is active.
    async fn current_session(&self) -> AuthResult<Option<Session>>;

    /// Resolves an account id to the email it registered with.
    async fn email_for_account(&self, account_id: &str) -> AuthResult<Option<String>>;

    /// Subscribes to session lifecycle events.
    ///
    /// Lagging subscribers miss superseded events; only the latest state
    /// matters to consumers.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
