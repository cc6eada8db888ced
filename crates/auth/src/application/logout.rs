//! Logout Use Cases
//!
//! Single-session logout (one secret, one device) and the all-devices
//! variant that kills every session an identity owns.

use std::sync::Arc;

use kernel::id::IdentityId;
use platform::client::ClientContext;

use crate::application::audit::AuditRecorder;
use crate::application::config::AuthConfig;
use crate::application::ledger::RefreshLedger;
use crate::domain::entity::AuditEventType;
use crate::domain::repository::{AuditRepository, RefreshTokenRepository};
use crate::domain::value_object::RefreshSecret;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<RT, A>
where
    RT: RefreshTokenRepository,
    A: AuditRepository,
{
    ledger: RefreshLedger<RT>,
    recorder: AuditRecorder<A>,
}

impl<RT, A> LogoutUseCase<RT, A>
where
    RT: RefreshTokenRepository,
    A: AuditRepository,
{
    pub fn new(token_repo: Arc<RT>, audit_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            ledger: RefreshLedger::new(token_repo, config.refresh_ttl_chrono()),
            recorder: AuditRecorder::new(audit_repo),
        }
    }

    /// End the session the secret belongs to
    ///
    /// Idempotent once the row exists: logging out an already-revoked
    /// session succeeds again. A secret with no row for this device is
    /// an error.
    pub async fn execute(&self, secret: &RefreshSecret, ctx: &ClientContext) -> AuthResult<()> {
        let token = self.ledger.revoke(secret, &ctx.device_id).await?;

        self.recorder
            .record(&token.owner_id, AuditEventType::Logout, ctx.ip_string())
            .await;

        tracing::info!(
            identity_id = %token.owner_id,
            device_id = %ctx.device_id,
            "Logged out"
        );

        Ok(())
    }

    /// End every session the identity owns, across all devices
    ///
    /// Idempotent: with nothing live this succeeds and revokes zero
    /// rows. Returns the number of rows revoked.
    pub async fn execute_all(
        &self,
        identity_id: &IdentityId,
        ip_address: Option<String>,
    ) -> AuthResult<u64> {
        let revoked = self.ledger.revoke_all(identity_id).await?;

        self.recorder
            .record(identity_id, AuditEventType::LogoutAll, ip_address)
            .await;

        tracing::info!(
            identity_id = %identity_id,
            revoked,
            "Logged out of all devices"
        );

        Ok(revoked)
    }
}
