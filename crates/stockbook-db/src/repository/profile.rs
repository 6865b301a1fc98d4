//! # Profile Repository
//!
//! Database operations for user profiles.
//!
//! ## Username Uniqueness
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Who Enforces Username Uniqueness                        │
//! │                                                                         │
//! │  1. Best-effort pre-check (auth layer)                                 │
//! │     └── username_taken() before sign-up / profile edit                 │
//! │         Inherently racy: two concurrent sign-ups can both pass          │
//! │                                                                         │
//! │  2. Authoritative constraint (this table)                               │
//! │     └── profiles.username UNIQUE                                        │
//! │         A lost race surfaces as StoreError::UniqueViolation             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use stockbook_core::{Profile, ProfilePatch};

// =============================================================================
// Row Type
// =============================================================================

/// Storage representation of a profile (snake_case columns).
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            phone_number: row.phone_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for profile database operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets a profile by its account id.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, username, full_name, phone_number, created_at, updated_at
            FROM profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    /// Finds a profile by username (the login-by-username lookup).
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, username, full_name, phone_number, created_at, updated_at
            FROM profiles
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    /// Best-effort uniqueness check.
    ///
    /// `exclude_id` lets a user keep their own username on profile edit.
    /// This is advisory only - the UNIQUE constraint is authoritative.
    pub async fn username_taken(
        &self,
        username: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<bool> {
        let count: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM profiles WHERE username = ?1 AND id != ?2",
                )
                .bind(username)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE username = ?1")
                    .bind(username)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count > 0)
    }

    /// Inserts a new profile.
    ///
    /// ## Returns
    /// * `Err(StoreError::UniqueViolation)` - username already registered
    ///   (the authoritative check; pre-checks upstream are best-effort)
    pub async fn insert(&self, profile: &Profile) -> StoreResult<()> {
        debug!(id = %profile.id, username = %profile.username, "Inserting profile");

        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, username, full_name, phone_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.username)
        .bind(&profile.full_name)
        .bind(&profile.phone_number)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a partial update and refreshes `updated_at`.
    pub async fn update(&self, id: &str, patch: &ProfilePatch) -> StoreResult<Profile> {
        debug!(id = %id, "Updating profile");

        let mut profile = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Profile", id))?;

        if let Some(username) = &patch.username {
            profile.username = username.trim().to_string();
        }
        if let Some(full_name) = &patch.full_name {
            profile.full_name = Some(full_name.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            profile.phone_number = Some(phone_number.clone());
        }
        profile.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                username = ?2,
                full_name = ?3,
                phone_number = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&profile.username)
        .bind(&profile.full_name)
        .bind(&profile.phone_number)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Profile", id));
        }

        Ok(profile)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockbook_core::{Profile, ProfilePatch};

    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};

    fn profile(id: &str, username: &str) -> Profile {
        let now = Utc::now();
        Profile {
            id: id.to_string(),
            username: username.to_string(),
            full_name: Some("Shop Owner".to_string()),
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_username() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        repo.insert(&profile("u1", "amira")).await.unwrap();

        let found = repo.find_by_username("amira").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_enforced_by_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        repo.insert(&profile("u1", "amira")).await.unwrap();
        let err = repo.insert(&profile("u2", "amira")).await.unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_username_taken_excludes_self() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        repo.insert(&profile("u1", "amira")).await.unwrap();

        assert!(repo.username_taken("amira", None).await.unwrap());
        // Keeping your own username is not a conflict
        assert!(!repo.username_taken("amira", Some("u1")).await.unwrap());
        assert!(repo.username_taken("amira", Some("u2")).await.unwrap());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        repo.insert(&profile("u1", "amira")).await.unwrap();

        let patch = ProfilePatch {
            phone_number: Some("+15550100".to_string()),
            ..ProfilePatch::default()
        };
        let updated = repo.update("u1", &patch).await.unwrap();

        assert_eq!(updated.username, "amira");
        assert_eq!(updated.phone_number.as_deref(), Some("+15550100"));
    }
}
