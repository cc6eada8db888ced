//! Domain Entities

pub mod audit_event;
pub mod identity;
pub mod refresh_token;

pub use audit_event::{AuditEvent, AuditEventType};
pub use identity::{Identity, IdentityProfile};
pub use refresh_token::RefreshToken;
