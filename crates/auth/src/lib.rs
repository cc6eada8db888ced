//! Auth (Authentication & Session) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and session services
//! - `infra/` - Store implementations (PostgreSQL, in-memory)
//!
//! ## Features
//! - Registration with email + password, default role assignment
//! - Login issuing an HS256 access token plus an opaque refresh token
//! - Single-use refresh token rotation, bound to the issuing device
//! - Per-session logout and all-devices logout
//! - Append-only audit trail of session lifecycle events
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional server-side pepper
//! - Refresh secrets are 64 random bytes, revoked monotonically;
//!   concurrent redemption of one secret admits exactly one winner
//! - Access tokens are stateless and verified by signature + expiry
//! - Credential and token failures are indistinguishable at the
//!   external boundary

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::login::{LoginInput, LoginUseCase, SessionOutput};
pub use application::logout::LogoutUseCase;
pub use application::refresh::RefreshUseCase;
pub use application::register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use application::token::{AccessClaims, TokenIssuer};
pub use application::validate::ValidateAccessUseCase;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthStore;
pub use infra::postgres::PgAuthStore;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

pub mod store {
    pub use crate::infra::memory::MemoryAuthStore;
    pub use crate::infra::postgres::PgAuthStore as AuthStore;
}

#[cfg(test)]
mod tests;
