//! Validate Access Use Case
//!
//! Stateless check of an access token. No store round-trip: a token
//! revoked "upstream" (logout, logoutAll) stays valid until its own
//! `exp`, by construction of self-contained access tokens.

use std::sync::Arc;

use crate::application::token::{AccessClaims, TokenIssuer};
use crate::error::AuthResult;

/// Access token validation use case
pub struct ValidateAccessUseCase {
    issuer: Arc<TokenIssuer>,
}

impl ValidateAccessUseCase {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    pub fn execute(&self, token: &str) -> AuthResult<AccessClaims> {
        self.issuer.verify_access_token(token)
    }
}
