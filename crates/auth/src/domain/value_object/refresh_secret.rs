//! Refresh Secret Value Object
//!
//! The opaque credential a client holds between rotations. It carries
//! no claims: it is a lookup key into the refresh ledger, nothing more.

use std::fmt;

use platform::crypto::{random_bytes, to_base64_url};

/// Random bytes per secret. 64 bytes = 512 bits of entropy, encoded to
/// an 86-character URL-safe string (fits the 512-char secret column
/// with a wide margin).
const SECRET_BYTES: usize = 64;

/// Opaque, high-entropy refresh secret
///
/// `Debug` output is redacted; `Display` is intentionally not
/// implemented so the value cannot end up in logs by accident.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefreshSecret(String);

impl RefreshSecret {
    /// Generate a fresh secret from the OS CSPRNG
    pub fn generate() -> Self {
        Self(to_base64_url(&random_bytes(SECRET_BYTES)))
    }

    /// Wrap a caller-presented secret
    ///
    /// No validation beyond non-emptiness: an unknown secret is an
    /// authentication failure at lookup time, not a format error.
    pub fn from_presented(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Create from database value
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the secret as a string slice (for storage and transport)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshSecret").field(&"[REDACTED]").finish()
    }
}
