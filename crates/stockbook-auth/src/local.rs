//! # Local Identity Provider
//!
//! In-tree [`AuthProvider`] backed by the `accounts` table in the same
//! SQLite database as the rest of the application. Passwords are hashed
//! with argon2id; sessions are JWT access tokens signed with the
//! configured secret.
//!
//! ## Sign-In Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Local Sign-In Flow                                  │
//! │                                                                         │
//! │  sign_in_with_password(email, password)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Lookup account by email ──── none ──► InvalidCredentials           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. argon2id verify ──────────── fail ──► InvalidCredentials           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Issue JWT (sub/iat/exp/jti, HS256)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Store session + broadcast SignedIn                                  │
//! │                                                                         │
//! │  Unknown email and wrong password are indistinguishable to callers.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::provider::{AuthProvider, Session, SessionEvent};
use stockbook_db::Database;

/// Capacity of the session event channel. Consumers only care about the
/// latest state, so a small buffer is enough.
const EVENT_CHANNEL_CAPACITY: usize = 16;

// =============================================================================
// JWT Claims
// =============================================================================

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject (account id)
    sub: String,

    /// Issued at (Unix timestamp)
    iat: i64,

    /// Expiration (Unix timestamp)
    exp: i64,

    /// JWT ID (unique identifier for this token)
    jti: String,
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage (argon2id, PHC string format).
fn hash_password(password: &str) -> AuthResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Credential(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Row Type
// =============================================================================

/// Storage representation of an account.
#[derive(Debug, Clone, sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

// =============================================================================
// Provider
// =============================================================================

/// Identity provider over the local `accounts` table.
pub struct LocalAuthProvider {
    pool: SqlitePool,
    config: AuthConfig,
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl LocalAuthProvider {
    /// Creates a provider over the given database.
    pub fn new(db: &Database, config: AuthConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        LocalAuthProvider {
            pool: db.pool().clone(),
            config,
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Issues a session token for an account.
    fn issue_session(&self, account_id: &str, email: &str) -> AuthResult<Session> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.session_ttl_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(format!("Failed to generate token: {}", e)))?;

        Ok(Session {
            user_id: account_id.to_string(),
            email: email.to_string(),
            access_token,
            expires_at,
        })
    }

    /// Stores the session locally and fans out the sign-in event.
    async fn install_session(&self, session: Session) {
        *self.session.write().await = Some(session.clone());
        // No subscribers yet is fine; send only fails then
        let _ = self.events.send(SessionEvent::SignedIn(session));
    }

    async fn find_account_by_email(&self, email: &str) -> AuthResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(stockbook_db::StoreError::from)?;

        Ok(row)
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn register(&self, email: &str, password: &str) -> AuthResult<Session> {
        debug!(email = %email, "Registering account");

        if self.find_account_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken {
                email: email.to_string(),
            });
        }

        let id = Uuid::new_v4().to_string();
        let password_hash = hash_password(password)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(stockbook_db::StoreError::from)?;

        info!(account_id = %id, "Account registered");

        let session = self.issue_session(&id, email)?;
        self.install_session(session.clone()).await;
        Ok(session)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let account = self
            .find_account_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        info!(account_id = %account.id, "Signed in");

        let session = self.issue_session(&account.id, &account.email)?;
        self.install_session(session.clone()).await;
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        *self.session.write().await = None;
        let _ = self.events.send(SessionEvent::SignedOut);
        info!("Signed out");
        Ok(())
    }

    async fn current_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn email_for_account(&self, account_id: &str) -> AuthResult<Option<String>> {
        let email: Option<String> =
            sqlx::query_scalar("SELECT email FROM accounts WHERE id = ?1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(stockbook_db::StoreError::from)?;

        Ok(email)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
