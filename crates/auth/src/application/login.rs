//! Login Use Case
//!
//! Authenticates an identity and opens a session for the device:
//! refresh ledger issue, access token, audit trail.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::client::ClientContext;
use platform::password::ClearTextPassword;

use crate::application::audit::AuditRecorder;
use crate::application::config::AuthConfig;
use crate::application::ledger::RefreshLedger;
use crate::application::token::TokenIssuer;
use crate::domain::entity::{AuditEventType, IdentityProfile};
use crate::domain::repository::{AuditRepository, IdentityRepository, RefreshTokenRepository};
use crate::domain::value_object::{Email, RefreshSecret};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Session credentials handed back by login and refresh
#[derive(Debug)]
pub struct SessionOutput {
    /// The authenticated identity, hash scrubbed
    pub identity: IdentityProfile,
    /// Signed access token
    pub access_token: String,
    /// Access token expiry
    pub access_expires_at: DateTime<Utc>,
    /// Opaque refresh secret for the next rotation
    pub refresh_secret: RefreshSecret,
}

/// Login use case
pub struct LoginUseCase<I, RT, A>
where
    I: IdentityRepository,
    RT: RefreshTokenRepository,
    A: AuditRepository,
{
    identity_repo: Arc<I>,
    ledger: RefreshLedger<RT>,
    recorder: AuditRecorder<A>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<I, RT, A> LoginUseCase<I, RT, A>
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
            config,
        }
    }

    pub async fn execute(
        &self,
        input: LoginInput,
        ctx: &ClientContext,
    ) -> AuthResult<SessionOutput> {
        // Any malformed email or policy-violating password can never
        // match a stored credential; collapse those into the same
        // rejection as a genuine mismatch.
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self
            .identity_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let verified = identity
            .password_hash
            .verify(&password, self.config.pepper())?;
        if !verified {
            tracing::warn!(identity_id = %identity.identity_id, "Password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        // Primary effects: ledger row first, then the access token.
        // A store failure here fails the whole login; nothing is
        // reported as issued unless it was durably persisted.
        let refresh_token = self.ledger.issue(&identity.identity_id, ctx).await?;
        let (access_token, access_expires_at) = self.issuer.issue_access_token(&identity)?;

        self.recorder
            .record(&identity.identity_id, AuditEventType::Login, ctx.ip_string())
            .await;

        tracing::info!(
            identity_id = %identity.identity_id,
            device_id = %ctx.device_id,
            "Login succeeded"
        );

        Ok(SessionOutput {
            identity: identity.profile(),
            access_token,
            access_expires_at,
            refresh_secret: refresh_token.secret,
        })
    }
}
