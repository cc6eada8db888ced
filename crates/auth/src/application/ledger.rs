//! Refresh Ledger
//!
//! The session lifecycle state machine. Per `(owner, device)` logical
//! session the states are:
//!
//! ```text
//! no-token --issue--> live --redeem--> rotated (revoked, replaced)
//!                      |  \--revoke--> logged-out (revoked)
//!                      \--(time)-----> expired
//! ```
//!
//! `revoked` is monotonic and every state-changing write is a
//! single-row conditional update or insert, so two concurrent
//! redeemers of the same secret are serialized by the store: exactly
//! one wins the `revoke_if_live` flip, the other observes the row
//! already revoked and is rejected. Rows are retained as history,
//! never deleted by the lifecycle.

use kernel::id::IdentityId;
use platform::client::{ClientContext, DeviceId};

use crate::domain::entity::RefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::RefreshSecret;
use crate::error::{AuthError, AuthResult};

/// Refresh token ledger over a repository
pub struct RefreshLedger<RT>
where
    RT: RefreshTokenRepository,
{
    repo: std::sync::Arc<RT>,
    refresh_ttl: chrono::Duration,
}

impl<RT> RefreshLedger<RT>
where
    RT: RefreshTokenRepository,
{
    pub fn new(repo: std::sync::Arc<RT>, refresh_ttl: chrono::Duration) -> Self {
        Self { repo, refresh_ttl }
    }

    /// Issue a live token for `(owner, device)`
    ///
    /// Entry point for both fresh login and rotation. Any live row
    /// still standing for the pair (a prior session that never rotated
    /// cleanly) is revoked first, so at most one row per pair is ever
    /// live.
    pub async fn issue(
        &self,
        owner_id: &IdentityId,
        ctx: &ClientContext,
    ) -> AuthResult<RefreshToken> {
        let displaced = self
            .repo
            .revoke_live_for_device(owner_id, &ctx.device_id)
            .await?;
        if displaced > 0 {
            tracing::debug!(
                identity_id = %owner_id,
                device_id = %ctx.device_id,
                displaced,
                "Revoked stale live tokens before issue"
            );
        }

        let token = RefreshToken::new(
            *owner_id,
            RefreshSecret::generate(),
            ctx.device_id.clone(),
            ctx.ip_string(),
            self.refresh_ttl,
        );
        self.repo.insert(&token).await?;

        Ok(token)
    }

    /// Redeem a secret: validate, then atomically consume it
    ///
    /// Returns the redeemed (now revoked) row; the caller pairs this
    /// with [`RefreshLedger::issue`] to complete a rotation.
    ///
    /// Failure modes:
    /// - no row for the secret: `TokenNotFound`
    /// - revoked, expired, or presented from the wrong device:
    ///   `TokenInvalid` (one variant for all three; the caller cannot
    ///   probe which check failed)
    /// - lost the race against a concurrent redeem/revoke of the same
    ///   row: `TokenInvalid`
    pub async fn redeem(
        &self,
        secret: &RefreshSecret,
        device_id: &DeviceId,
    ) -> AuthResult<RefreshToken> {
        let token = self
            .repo
            .find_by_secret(secret)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if token.device_id != *device_id {
            tracing::warn!(
                token_id = %token.token_id,
                identity_id = %token.owner_id,
                "Refresh token presented from a different device"
            );
            return Err(AuthError::TokenInvalid);
        }

        if !token.is_usable() {
            tracing::debug!(
                token_id = %token.token_id,
                revoked = token.revoked,
                expired = token.is_expired(),
                "Refresh token no longer usable"
            );
            return Err(AuthError::TokenInvalid);
        }

        // Single-use enforcement: only the caller whose flip lands
        // first may proceed to mint a replacement.
        if !self.repo.revoke_if_live(secret).await? {
            tracing::debug!(
                token_id = %token.token_id,
                "Lost redemption race; token already consumed"
            );
            return Err(AuthError::TokenInvalid);
        }

        Ok(token)
    }

    /// Explicit logout of one session
    ///
    /// `TokenNotFound` unless a row matches secret AND device. The flip
    /// itself is idempotent: revoking an already-revoked row is not an
    /// error and mints no replacement.
    pub async fn revoke(
        &self,
        secret: &RefreshSecret,
        device_id: &DeviceId,
    ) -> AuthResult<RefreshToken> {
        let token = self
            .repo
            .find_by_secret(secret)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if token.device_id != *device_id {
            return Err(AuthError::TokenNotFound);
        }

        self.repo.revoke_if_live(secret).await?;

        Ok(token)
    }

    /// Kill every session the identity owns, across all devices
    ///
    /// Idempotent; each row's revocation is its own atomic flip, so a
    /// redeem racing this on one row is resolved by whichever flip
    /// lands first. Returns the number of rows revoked.
    pub async fn revoke_all(&self, owner_id: &IdentityId) -> AuthResult<u64> {
        self.repo.revoke_all_for_identity(owner_id).await
    }
}
