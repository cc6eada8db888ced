//! Value Objects

pub mod email;
pub mod identity_status;
pub mod refresh_secret;
pub mod role;

pub use email::Email;
pub use identity_status::IdentityStatus;
pub use refresh_secret::RefreshSecret;
pub use role::{DEFAULT_ROLE_NAME, Role, RoleName};
