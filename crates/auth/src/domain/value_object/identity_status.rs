//! Identity Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity account status
///
/// Mutated only by administrative flows; the core sets `Active` at
/// registration and otherwise carries the value through into access
/// token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum IdentityStatus {
    /// Normal account
    #[default]
    Active = 0,
    /// Registered but profile completion pending
    PendingProfile = 1,
    /// Administratively blocked
    Blocked = 2,
}

impl IdentityStatus {
    /// Storage id
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Create from storage id
    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(IdentityStatus::Active),
            1 => Some(IdentityStatus::PendingProfile),
            2 => Some(IdentityStatus::Blocked),
            _ => None,
        }
    }

    /// Wire code, as embedded in access token claims
    pub const fn code(&self) -> &'static str {
        match self {
            IdentityStatus::Active => "ACTIVE",
            IdentityStatus::PendingProfile => "PENDING_PROFILE",
            IdentityStatus::Blocked => "BLOCKED",
        }
    }

    /// Parse a wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ACTIVE" => Some(IdentityStatus::Active),
            "PENDING_PROFILE" => Some(IdentityStatus::PendingProfile),
            "BLOCKED" => Some(IdentityStatus::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        for status in [
            IdentityStatus::Active,
            IdentityStatus::PendingProfile,
            IdentityStatus::Blocked,
        ] {
            assert_eq!(IdentityStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(IdentityStatus::from_id(99), None);
    }

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(
            IdentityStatus::from_code("ACTIVE"),
            Some(IdentityStatus::Active)
        );
        assert_eq!(
            IdentityStatus::from_code("PENDING_PROFILE"),
            Some(IdentityStatus::PendingProfile)
        );
        assert_eq!(IdentityStatus::from_code("bogus"), None);
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(IdentityStatus::default(), IdentityStatus::Active);
    }
}
