//! # Auth Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use std::env;

/// Default session lifetime: 7 days.
const DEFAULT_SESSION_TTL_SECS: i64 = 604_800;

/// Identity provider configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    pub session_ttl_secs: i64,
}

impl AuthConfig {
    /// Loads configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `STOCKBOOK_JWT_SECRET` - token signing secret
    /// - `STOCKBOOK_SESSION_TTL_SECONDS` - session lifetime (default 7 days)
    pub fn load() -> Self {
        AuthConfig {
            jwt_secret: env::var("STOCKBOOK_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "stockbook-dev-secret-change-in-production".to_string()
            }),

            session_ttl_secs: env::var("STOCKBOOK_SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            jwt_secret: "stockbook-dev-secret-change-in-production".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}
