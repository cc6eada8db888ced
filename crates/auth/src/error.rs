//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` boundary model.
//!
//! The three authentication-failure variants (`InvalidCredentials`,
//! `TokenNotFound`, `TokenInvalid`) are deliberately indistinguishable
//! once converted with [`AuthError::to_app_error`]: the caller sees one
//! generic rejection, so neither account enumeration nor the reason a
//! token was refused leaks across the boundary. The distinctions exist
//! only internally and in logs.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered
    #[error("Email already registered")]
    DuplicateIdentity,

    /// Deployment misconfiguration (e.g. default role not seeded)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown email or wrong password - same variant for both
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No refresh token row for the presented secret
    #[error("Refresh token not found")]
    TokenNotFound,

    /// Refresh token revoked, expired, device-mismatched, or an access
    /// token that failed verification
    #[error("Token invalid")]
    TokenInvalid,

    /// Input validation failure (email format, password policy, device id)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transient store failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateIdentity => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::TokenNotFound
            | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to the boundary error
    ///
    /// All authentication failures collapse into one message; server
    /// faults hide their detail from the caller.
    pub fn to_app_error(&self) -> AppError {
        self.log();
        match self {
            AuthError::DuplicateIdentity => AppError::conflict("Email already registered"),
            AuthError::InvalidCredentials
            | AuthError::TokenNotFound
            | AuthError::TokenInvalid => AppError::unauthorized("Authentication failed"),
            AuthError::Validation(msg) => AppError::bad_request(msg.clone()),
            AuthError::StoreUnavailable(_) => {
                AppError::service_unavailable("Service temporarily unavailable")
            }
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Auth store error");
            }
            AuthError::Configuration(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<platform::client::ClientContextError> for AuthError {
    fn from(err: platform::client::ClientContextError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
