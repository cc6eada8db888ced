//! Role Value Objects
//!
//! Roles are immutable reference data seeded by migration. A missing
//! default role is a deployment fault, not a user error.

use kernel::id::RoleId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Name of the default role granted at registration
pub const DEFAULT_ROLE_NAME: &str = "ROLE_USER";

/// Maximum role name length (storage column width)
const ROLE_NAME_MAX_LENGTH: usize = 50;

/// Role name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Create a validated role name
    pub fn new(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(AuthError::Validation("Role name cannot be empty".to_string()));
        }
        if trimmed.len() > ROLE_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Role name must be at most {} characters",
                ROLE_NAME_MAX_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The default role every registered identity receives
    pub fn user() -> Self {
        Self(DEFAULT_ROLE_NAME.to_string())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role entity (immutable reference data)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Internal identifier
    pub role_id: RoleId,
    /// Unique name
    pub name: RoleName,
}

impl Role {
    /// Create a new role
    pub fn new(name: RoleName) -> Self {
        Self {
            role_id: RoleId::new(),
            name,
        }
    }
}
