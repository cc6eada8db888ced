//! In-Memory Repository Implementations
//!
//! A single mutex-guarded store implementing every repository trait.
//! Used by the scenario tests and useful as a harness backend; all
//! state-changing operations take the one lock, which trivially gives
//! the same conditional-update atomicity the Postgres store gets from
//! row-level updates.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::IdentityId;
use platform::client::DeviceId;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entity::{AuditEvent, Identity, RefreshToken};
use crate::domain::repository::{
    AuditRepository, IdentityRepository, RefreshTokenRepository, RoleRepository,
};
use crate::domain::value_object::{Email, RefreshSecret, Role, RoleName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    identities: HashMap<Uuid, Identity>,
    roles: Vec<Role>,
    tokens: Vec<RefreshToken>,
    audit: Vec<AuditEvent>,
}

/// In-memory auth store
#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given roles
    pub fn with_roles(names: &[&str]) -> Self {
        let roles = names
            .iter()
            .map(|n| Role::new(RoleName::from_db(*n)))
            .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                roles,
                ..State::default()
            })),
        }
    }

    /// Snapshot of the audit trail (test inspection)
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.lock().await.audit.clone()
    }

    /// Snapshot of all ledger rows, live or not (test inspection)
    pub async fn token_rows(&self) -> Vec<RefreshToken> {
        self.state.lock().await.tokens.clone()
    }

    /// Overwrite one ledger row in place (test setup for expiry cases)
    pub async fn put_token(&self, token: RefreshToken) {
        let mut state = self.state.lock().await;
        state.tokens.retain(|t| t.token_id != token.token_id);
        state.tokens.push(token);
    }
}

impl IdentityRepository for MemoryAuthStore {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut state = self.state.lock().await;

        if state
            .identities
            .values()
            .any(|i| i.email == identity.email)
        {
            return Err(AuthError::DuplicateIdentity);
        }

        state
            .identities
            .insert(*identity.identity_id.as_uuid(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let state = self.state.lock().await;
        Ok(state.identities.get(identity_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let state = self.state.lock().await;
        Ok(state.identities.values().find(|i| i.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let state = self.state.lock().await;
        Ok(state.identities.values().any(|i| i.email == *email))
    }
}

impl RoleRepository for MemoryAuthStore {
    async fn find_by_name(&self, name: &RoleName) -> AuthResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|r| r.name == *name).cloned())
    }
}

impl RefreshTokenRepository for MemoryAuthStore {
    async fn insert(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut state = self.state.lock().await;

        if state.tokens.iter().any(|t| t.secret == token.secret) {
            return Err(AuthError::Internal(
                "Refresh secret collision".to_string(),
            ));
        }

        state.tokens.push(token.clone());
        Ok(())
    }

    async fn find_by_secret(&self, secret: &RefreshSecret) -> AuthResult<Option<RefreshToken>> {
        let state = self.state.lock().await;
        Ok(state.tokens.iter().find(|t| t.secret == *secret).cloned())
    }

    async fn revoke_if_live(&self, secret: &RefreshSecret) -> AuthResult<bool> {
        let mut state = self.state.lock().await;

        match state
            .tokens
            .iter_mut()
            .find(|t| t.secret == *secret && !t.revoked)
        {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_live_for_device(
        &self,
        owner_id: &IdentityId,
        device_id: &DeviceId,
    ) -> AuthResult<u64> {
        let mut state = self.state.lock().await;

        let mut flipped = 0;
        for token in state.tokens.iter_mut().filter(|t| {
            t.owner_id == *owner_id && t.device_id == *device_id && !t.revoked
        }) {
            token.revoked = true;
            flipped += 1;
        }

        Ok(flipped)
    }

    async fn revoke_all_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64> {
        let mut state = self.state.lock().await;

        let mut flipped = 0;
        for token in state
            .tokens
            .iter_mut()
            .filter(|t| t.owner_id == *owner_id && !t.revoked)
        {
            token.revoked = true;
            flipped += 1;
        }

        Ok(flipped)
    }

    async fn purge_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64> {
        let mut state = self.state.lock().await;

        let before = state.tokens.len();
        state.tokens.retain(|t| t.owner_id != *owner_id);

        Ok((before - state.tokens.len()) as u64)
    }
}

impl AuditRepository for MemoryAuthStore {
    async fn append(&self, event: &AuditEvent) -> AuthResult<()> {
        let mut state = self.state.lock().await;
        state.audit.push(event.clone());
        Ok(())
    }
}
