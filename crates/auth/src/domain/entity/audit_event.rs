//! Audit Event Entity
//!
//! Append-only record of security-relevant actions. Never mutated or
//! deleted by this core.

use chrono::{DateTime, Utc};
use kernel::id::{AuditEventId, IdentityId};
use std::fmt;

/// Security-relevant event classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    Login,
    RefreshToken,
    Logout,
    LogoutAll,
}

impl AuditEventType {
    /// Wire/storage code
    pub const fn code(&self) -> &'static str {
        match self {
            AuditEventType::Login => "LOGIN",
            AuditEventType::RefreshToken => "REFRESH_TOKEN",
            AuditEventType::Logout => "LOGOUT",
            AuditEventType::LogoutAll => "LOGOUT_ALL",
        }
    }

    /// Parse a storage code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LOGIN" => Some(AuditEventType::Login),
            "REFRESH_TOKEN" => Some(AuditEventType::RefreshToken),
            "LOGOUT" => Some(AuditEventType::Logout),
            "LOGOUT_ALL" => Some(AuditEventType::LogoutAll),
            _ => None,
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Audit trail row
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Internal UUID identifier
    pub event_id: AuditEventId,
    /// Identity the event concerns
    pub identity_id: IdentityId,
    /// What happened
    pub event_type: AuditEventType,
    /// Origin IP, when known
    pub ip_address: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Create a new event row
    pub fn new(
        identity_id: IdentityId,
        event_type: AuditEventType,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            event_id: AuditEventId::new(),
            identity_id,
            event_type,
            ip_address,
            created_at: Utc::now(),
        }
    }
}
