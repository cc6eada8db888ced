//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer (`infra::postgres`, `infra::memory`).
//!
//! All refresh-token writes are single-row conditional updates or
//! inserts. The conditional contract on [`RefreshTokenRepository`] is
//! what makes rotation race-free: the store, not the caller, decides
//! which of two concurrent redeemers wins.

use kernel::id::IdentityId;
use platform::client::DeviceId;

use crate::domain::entity::{AuditEvent, Identity, RefreshToken};
use crate::domain::value_object::{Email, RefreshSecret, Role, RoleName};
use crate::error::AuthResult;

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Persist a new identity with its role assignments.
    /// Email uniqueness is enforced here, at the storage layer.
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Find identity by ID
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>>;

    /// Find identity by email (exact, case-sensitive match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Role repository trait (read-only reference data)
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Find role by unique name
    async fn find_by_name(&self, name: &RoleName) -> AuthResult<Option<Role>>;
}

/// Refresh token ledger trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Insert a new live row
    async fn insert(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Look up a row by its unique secret
    async fn find_by_secret(&self, secret: &RefreshSecret) -> AuthResult<Option<RefreshToken>>;

    /// Atomic conditional flip: set `revoked = true` where the secret
    /// matches AND the row is not yet revoked.
    ///
    /// Returns `true` iff this caller performed the flip. Under
    /// concurrent redemption of the same secret, exactly one caller
    /// observes `true`; everyone else gets `false`.
    async fn revoke_if_live(&self, secret: &RefreshSecret) -> AuthResult<bool>;

    /// Revoke every live row for an `(owner, device)` pair.
    /// Returns the number of rows flipped.
    async fn revoke_live_for_device(
        &self,
        owner_id: &IdentityId,
        device_id: &DeviceId,
    ) -> AuthResult<u64>;

    /// Revoke every live row owned by the identity, across all devices.
    /// Each row's flip is an independent atomic conditional update; no
    /// lock spans the set. Idempotent: already-revoked rows count zero.
    async fn revoke_all_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64>;

    /// Administrative deletion of all rows (live or not) for an
    /// identity. The only deletion path; the session lifecycle itself
    /// never deletes rows.
    async fn purge_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64>;
}

/// Audit trail trait
#[trait_variant::make(AuditRepository: Send)]
pub trait LocalAuditRepository {
    /// Append one event row
    async fn append(&self, event: &AuditEvent) -> AuthResult<()>;
}
