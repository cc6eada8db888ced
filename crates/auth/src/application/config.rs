//! Application Configuration
//!
//! Configuration for the auth application layer. Loading values from
//! the environment is the embedding process's job; this is just the
//! typed shape.

use std::time::Duration;

use crate::domain::value_object::RoleName;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing key for access tokens
    pub token_secret: Vec<u8>,
    /// Access token TTL (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_ttl: Duration,
    /// Role granted to every new registration; must be seeded
    pub default_role: RoleName,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            default_role: RoleName::user(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing key (for development/tests)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Access TTL as a chrono duration
    pub fn access_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.access_ttl.as_millis() as i64)
    }

    /// Refresh TTL as a chrono duration
    pub fn refresh_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.refresh_ttl.as_millis() as i64)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
