//! # Session Context
//!
//! The process-wide session state, held as an explicit object rather than
//! a global. Resolves usernames to account emails, drives the
//! sign-up/sign-in/sign-out flows, and mirrors the provider's session
//! events into local state.
//!
//! ## Sign-Up Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sign-Up Flow                                     │
//! │                                                                         │
//! │  sign_up(email, password, username, ...)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate username format                                            │
//! │  2. Pre-check username availability ── taken ──► DuplicateUsername     │
//! │     (best-effort; the UNIQUE constraint below is authoritative)         │
//! │  3. Register account with the provider ── dup ──► EmailTaken           │
//! │  4. Insert profile row ── UNIQUE lost race ──► DuplicateUsername       │
//! │  5. Sign the fresh session back out                                     │
//! │     (the new account must log in explicitly)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};
use crate::provider::{AuthProvider, Session, SessionEvent};
use stockbook_core::validation::validate_username;
use stockbook_core::{Profile, ProfilePatch};
use stockbook_db::{ProfileRepository, StoreError};

/// Fields for creating a new account with its profile.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Process-wide session state over an identity provider.
pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    profiles: ProfileRepository,
    session: Arc<RwLock<Option<Session>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthContext {
    /// Creates the context, picking up any session the provider already
    /// holds, and starts mirroring session events into local state.
    pub async fn init(
        provider: Arc<dyn AuthProvider>,
        profiles: ProfileRepository,
    ) -> AuthResult<Self> {
        let session = Arc::new(RwLock::new(provider.current_session().await?));

        let rx = provider.subscribe();
        let listener = spawn_session_listener(rx, session.clone());

        Ok(AuthContext {
            provider,
            profiles,
            session,
            listener: Mutex::new(Some(listener)),
        })
    }

    /// Stops the event listener. The context keeps its last-known session
    /// but no longer tracks changes.
    pub fn close(&self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }

    /// Registers a new account with its profile.
    ///
    /// The provider signs the fresh account in as a side effect of
    /// registration; this flow signs it back out so the user logs in
    /// explicitly.
    pub async fn sign_up(&self, request: SignUpRequest) -> AuthResult<Profile> {
        let username = request.username.trim().to_string();
        validate_username(&username)?;

        // Best-effort pre-check; the UNIQUE constraint decides losers of a race
        if self.profiles.username_taken(&username, None).await? {
            return Err(AuthError::DuplicateUsername { username });
        }

        let session = self
            .provider
            .register(&request.email, &request.password)
            .await?;

        let now = chrono::Utc::now();
        let profile = Profile {
            id: session.user_id.clone(),
            username: username.clone(),
            full_name: request.full_name,
            phone_number: request.phone_number,
            created_at: now,
            updated_at: now,
        };

        match self.profiles.insert(&profile).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { .. }) => {
                // Lost the race after the pre-check passed
                self.provider.sign_out().await?;
                return Err(AuthError::DuplicateUsername { username });
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %profile.id, username = %profile.username, "Signed up");

        // Fresh accounts must log in explicitly
        self.provider.sign_out().await?;
        *self.session.write().await = None;

        Ok(profile)
    }

    /// Signs in by username.
    pub async fn sign_in(&self, username: &str, password: &str) -> AuthResult<Session> {
        let profile = self
            .profiles
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::UsernameNotFound)?;

        let email = self
            .provider
            .email_for_account(&profile.id)
            .await?
            .ok_or(AuthError::UsernameNotFound)?;

        let session = self.provider.sign_in_with_password(&email, password).await?;

        debug!(user_id = %session.user_id, "Session established");
        *self.session.write().await = Some(session.clone());

        Ok(session)
    }

    /// Ends the current session.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out().await?;
        *self.session.write().await = None;
        Ok(())
    }

    /// Applies a partial update to the signed-in user's profile.
    pub async fn update_profile(&self, patch: ProfilePatch) -> AuthResult<Profile> {
        let user_id = self
            .current_user_id()
            .await
            .ok_or(AuthError::NotAuthenticated)?;

        if let Some(username) = &patch.username {
            let username = username.trim().to_string();
            validate_username(&username)?;

            if self
                .profiles
                .username_taken(&username, Some(&user_id))
                .await?
            {
                return Err(AuthError::DuplicateUsername { username });
            }
        }

        match self.profiles.update(&user_id, &patch).await {
            Ok(profile) => Ok(profile),
            Err(StoreError::UniqueViolation { value, .. }) => {
                Err(AuthError::DuplicateUsername { username: value })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The signed-in user's profile, if any.
    pub async fn profile(&self) -> AuthResult<Option<Profile>> {
        match self.current_user_id().await {
            Some(user_id) => Ok(self.profiles.get_by_id(&user_id).await?),
            None => Ok(None),
        }
    }

    /// The current session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// The signed-in account id, if any.
    pub async fn current_user_id(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id.clone())
    }
}

/// Mirrors provider session events into the shared session slot.
fn spawn_session_listener(
    mut rx: broadcast::Receiver<SessionEvent>,
    session: Arc<RwLock<Option<Session>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SessionEvent::SignedIn(s)) => {
                    debug!(user_id = %s.user_id, "Session event: signed in");
                    *session.write().await = Some(s);
                }
                Ok(SessionEvent::SignedOut) => {
                    debug!("Session event: signed out");
                    *session.write().await = None;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Only the latest state matters; keep listening
                    warn!(missed, "Session event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::local::LocalAuthProvider;
    use stockbook_db::{Database, DbConfig};

    async fn context() -> AuthContext {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let provider = Arc::new(LocalAuthProvider::new(&db, AuthConfig::default()));
        AuthContext::init(provider, db.profiles()).await.unwrap()
    }

    fn sign_up_request(username: &str, email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "hunter2!".to_string(),
            username: username.to_string(),
            full_name: Some("Shop Owner".to_string()),
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_sign_up_leaves_user_signed_out() {
        let ctx = context().await;

        let profile = ctx
            .sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();
        assert_eq!(profile.username, "amira");

        // Registration must not leave a live session behind
        assert!(ctx.current_session().await.is_none());
        assert!(ctx.profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_by_username() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();

        let session = ctx.sign_in("amira", "hunter2!").await.unwrap();
        assert_eq!(session.email, "amira@example.com");
        assert_eq!(ctx.current_user_id().await, Some(session.user_id.clone()));

        let profile = ctx.profile().await.unwrap().unwrap();
        assert_eq!(profile.username, "amira");
    }

    #[tokio::test]
    async fn test_unknown_username_message_is_exact() {
        let ctx = context().await;

        let err = ctx.sign_in("nobody", "whatever").await.unwrap_err();
        assert_eq!(err.to_string(), "Username not found");
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();

        let err = ctx.sign_in("amira", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(ctx.current_session().await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();

        let err = ctx
            .sign_up(sign_up_request("amira", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn test_invalid_username_rejected_before_registration() {
        let ctx = context().await;

        let err = ctx
            .sign_up(sign_up_request("not a valid name!", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let ctx = context().await;

        let err = ctx.update_profile(ProfilePatch::default()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_own_username() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();
        ctx.sign_in("amira", "hunter2!").await.unwrap();

        // Re-submitting your own username is not a conflict
        let patch = ProfilePatch {
            username: Some("amira".to_string()),
            full_name: Some("Amira K".to_string()),
            ..ProfilePatch::default()
        };
        let updated = ctx.update_profile(patch).await.unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Amira K"));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_username() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();
        ctx.sign_up(sign_up_request("basim", "basim@example.com"))
            .await
            .unwrap();
        ctx.sign_in("basim", "hunter2!").await.unwrap();

        let patch = ProfilePatch {
            username: Some("amira".to_string()),
            ..ProfilePatch::default()
        };
        let err = ctx.update_profile(patch).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let ctx = context().await;
        ctx.sign_up(sign_up_request("amira", "amira@example.com"))
            .await
            .unwrap();
        ctx.sign_in("amira", "hunter2!").await.unwrap();

        ctx.sign_out().await.unwrap();
        assert!(ctx.current_session().await.is_none());

        ctx.close();
    }
}
