//! Access Token Issuer
//!
//! Issues and verifies the short-lived, self-contained access token.
//! HS256 JWT with identity id as subject plus email, role names, and
//! status claims. Access tokens are never persisted; the signature and
//! `exp` claim are the whole trust decision.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::IdentityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::Identity;
use crate::error::{AuthError, AuthResult};

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: identity id
    pub sub: String,
    /// Email at issuance
    pub email: String,
    /// Role names at issuance
    pub roles: Vec<String>,
    /// Status code at issuance
    pub status: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Parse the subject back into an identity id
    pub fn identity_id(&self) -> AuthResult<IdentityId> {
        let uuid: Uuid = self
            .sub
            .parse()
            .map_err(|_| AuthError::Internal(format!("Malformed subject claim: {}", self.sub)))?;
        Ok(IdentityId::from_uuid(uuid))
    }
}

/// Access token issuer/verifier
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: chrono::Duration,
}

impl TokenIssuer {
    /// Create an issuer from config
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token one second past `exp` is dead
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
            access_ttl: config.access_ttl_chrono(),
        }
    }

    /// Issue a signed access token for the identity
    ///
    /// Returns the compact token and its expiry instant.
    pub fn issue_access_token(
        &self,
        identity: &Identity,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;

        let claims = AccessClaims {
            sub: identity.identity_id.to_string(),
            email: identity.email.as_str().to_string(),
            roles: identity.role_names(),
            status: identity.status.code().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        // `exp` is whole seconds; report the expiry the token actually carries
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok((token, expires_at))
    }

    /// Verify an access token and return its claims
    ///
    /// Fails closed: malformed, badly signed, and expired tokens are
    /// all `TokenInvalid`. The cause goes to the debug log only, never
    /// into the trust decision handed back to the caller.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        match decode::<AccessClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                tracing::debug!(cause = %e, "Access token rejected");
                Err(AuthError::TokenInvalid)
            }
        }
    }
}
