//! Register Use Case
//!
//! Creates a new identity with the default role.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Identity, IdentityProfile};
use crate::domain::repository::{IdentityRepository, RoleRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use platform::password::ClearTextPassword;

/// Register input
pub struct RegisterInput {
    /// Unique email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Display name (profile field, forwarded by the transport)
    pub name: String,
    /// Age (profile field)
    pub age: Option<u32>,
}

/// Register output: the identity, hash scrubbed
pub struct RegisterOutput {
    pub identity: IdentityProfile,
}

/// Register use case
pub struct RegisterUseCase<I, R>
where
    I: IdentityRepository,
    R: RoleRepository,
{
    identity_repo: Arc<I>,
    role_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<I, R> RegisterUseCase<I, R>
where
    I: IdentityRepository,
    R: RoleRepository,
{
    pub fn new(identity_repo: Arc<I>, role_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            identity_repo,
            role_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email)?;

        if self.identity_repo.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateIdentity);
        }

        // The default role is seeded reference data; its absence is a
        // broken deployment, not a user error.
        let default_role = self
            .role_repo
            .find_by_name(&self.config.default_role)
            .await?
            .ok_or_else(|| {
                AuthError::Configuration(format!(
                    "Default role {} not found",
                    self.config.default_role
                ))
            })?;

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash(self.config.pepper())?;

        let identity = Identity::new(email, password_hash, vec![default_role.name]);
        self.identity_repo.create(&identity).await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            "Identity registered"
        );

        Ok(RegisterOutput {
            identity: identity.profile(),
        })
    }
}
