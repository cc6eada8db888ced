//! Refresh Token Entity
//!
//! A persisted row in the refresh ledger. One row per issued secret;
//! rows are revoked, never reverted, and retained as history.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{IdentityId, RefreshTokenId};
use platform::client::DeviceId;

use crate::domain::value_object::RefreshSecret;

/// Refresh token ledger row
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Internal UUID identifier
    pub token_id: RefreshTokenId,
    /// Owning identity
    pub owner_id: IdentityId,
    /// Globally unique opaque secret
    pub secret: RefreshSecret,
    /// Device the token is bound to
    pub device_id: DeviceId,
    /// Origin IP at issuance (for audit/history)
    pub origin_ip: Option<String>,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
    /// Monotonic revocation flag: once true, never false again
    pub revoked: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Create a new live row
    ///
    /// TTL comes from the application layer (config), not from here.
    pub fn new(
        owner_id: IdentityId,
        secret: RefreshSecret,
        device_id: DeviceId,
        origin_ip: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            token_id: RefreshTokenId::new(),
            owner_id,
            secret,
            device_id,
            origin_ip,
            expires_at: now + ttl,
            revoked: false,
            created_at: now,
        }
    }

    /// Check if the token has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// A token is usable iff not revoked and not expired.
    ///
    /// Both flags are independent: an expired-but-unrevoked row is just
    /// as dead as a revoked one.
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }
}
