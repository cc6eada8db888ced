//! Identity Entity
//!
//! The registered principal: email, credential hash, status, roles.

use chrono::{DateTime, Utc};
use kernel::id::IdentityId;
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, IdentityStatus, RoleName};

/// Identity entity
///
/// Carries the password hash; never hand this across the external
/// boundary - use [`Identity::profile`] for anything caller-facing.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier
    pub identity_id: IdentityId,
    /// Unique email (case-sensitive as stored)
    pub email: Email,
    /// Argon2id hash of the password
    pub password_hash: HashedPassword,
    /// Account status
    pub status: IdentityStatus,
    /// Assigned roles (non-empty after registration)
    pub roles: Vec<RoleName>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity
    ///
    /// Timestamps are set here, at the call site, not by storage hooks.
    pub fn new(email: Email, password_hash: HashedPassword, roles: Vec<RoleName>) -> Self {
        let now = Utc::now();

        Self {
            identity_id: IdentityId::new(),
            email,
            password_hash,
            status: IdentityStatus::Active,
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update account status (administrative flows)
    pub fn set_status(&mut self, status: IdentityStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Role names as plain strings (for token claims)
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// Caller-facing view with the credential hash scrubbed
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile {
            identity_id: self.identity_id,
            email: self.email.clone(),
            status: self.status,
            roles: self.roles.clone(),
            created_at: self.created_at,
        }
    }
}

/// Identity view safe to return to callers (no credential material)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub identity_id: IdentityId,
    pub email: Email,
    pub status: IdentityStatus,
    pub roles: Vec<RoleName>,
    pub created_at: DateTime<Utc>,
}
