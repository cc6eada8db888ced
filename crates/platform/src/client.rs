//! Client identification
//!
//! Per-request client context passed explicitly through the call chain.
//! The transport layer (HTTP handlers, cookie plumbing) is responsible
//! for minting a device identifier before invoking the core; the core
//! always requires a non-empty one.

use std::fmt;
use std::net::IpAddr;

/// Maximum device identifier length (storage column width)
pub const MAX_DEVICE_ID_LENGTH: usize = 128;

/// Error when building a client context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientContextError {
    #[error("Device identifier cannot be empty")]
    EmptyDeviceId,

    #[error("Device identifier must be at most {MAX_DEVICE_ID_LENGTH} characters")]
    DeviceIdTooLong,
}

/// Opaque device identifier a session is bound to
///
/// The value is caller-minted (installation id, hashed fingerprint,
/// whatever the transport chooses); the core only requires that it is
/// non-empty and stable per device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a validated device identifier
    pub fn new(raw: impl Into<String>) -> Result<Self, ClientContextError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ClientContextError::EmptyDeviceId);
        }
        if trimmed.len() > MAX_DEVICE_ID_LENGTH {
            return Err(ClientContextError::DeviceIdTooLong);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client context for a single request
///
/// Bound into issued refresh tokens (device) and recorded in the audit
/// trail (ip).
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Device the request originates from
    pub device_id: DeviceId,
    /// Origin IP, when the transport can determine it
    pub ip: Option<IpAddr>,
}

impl ClientContext {
    /// Create a new client context
    pub fn new(device_id: DeviceId, ip: Option<IpAddr>) -> Self {
        Self { device_id, ip }
    }

    /// Get IP as string (for storage / audit rows)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}
