//! Refresh Use Case
//!
//! Rotates a refresh token: the presented secret is consumed exactly
//! once and a replacement is minted for the same device, alongside a
//! fresh access token.

use std::sync::Arc;

use platform::client::ClientContext;

use crate::application::audit::AuditRecorder;
use crate::application::config::AuthConfig;
use crate::application::ledger::RefreshLedger;
use crate::application::login::SessionOutput;
use crate::application::token::TokenIssuer;
use crate::domain::entity::AuditEventType;
use crate::domain::repository::{AuditRepository, IdentityRepository, RefreshTokenRepository};
use crate::domain::value_object::RefreshSecret;
use crate::error::{AuthError, AuthResult};

/// Refresh (rotation) use case
pub struct RefreshUseCase<I, RT, A>
where
    I: IdentityRepository,
    RT: RefreshTokenRepository,
    A: AuditRepository,
{
    identity_repo: Arc<I>,
    ledger: RefreshLedger<RT>,
    recorder: AuditRecorder<A>,
    issuer: Arc<TokenIssuer>,
}

impl<I, RT, A> RefreshUseCase<I, RT, A>
where
    I: IdentityRepository,
    RT: RefreshTokenRepository,
    A: AuditRepository,
{
    pub fn new(
        identity_repo: Arc<I>,
        token_repo: Arc<RT>,
        audit_repo: Arc<A>,
        issuer: Arc<TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            identity_repo,
            ledger: RefreshLedger::new(token_repo, config.refresh_ttl_chrono()),
            recorder: AuditRecorder::new(audit_repo),
            issuer,
        }
    }

    pub async fn execute(
        &self,
        secret: &RefreshSecret,
        ctx: &ClientContext,
    ) -> AuthResult<SessionOutput> {
        // Consume first: after this point the presented secret is dead
        // whether or not the rest of the rotation completes.
        let redeemed = self.ledger.redeem(secret, &ctx.device_id).await?;

        let identity = self
            .identity_repo
            .find_by_id(&redeemed.owner_id)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "Refresh token owner {} has no identity row",
                    redeemed.owner_id
                ))
            })?;

        let replacement = self.ledger.issue(&identity.identity_id, ctx).await?;
        let (access_token, access_expires_at) = self.issuer.issue_access_token(&identity)?;

        self.recorder
            .record(
                &identity.identity_id,
                AuditEventType::RefreshToken,
                ctx.ip_string(),
            )
            .await;

        tracing::info!(
            identity_id = %identity.identity_id,
            device_id = %ctx.device_id,
            consumed = %redeemed.token_id,
            issued = %replacement.token_id,
            "Refresh token rotated"
        );

        Ok(SessionOutput {
            identity: identity.profile(),
            access_token,
            access_expires_at,
            refresh_secret: replacement.secret,
        })
    }
}
