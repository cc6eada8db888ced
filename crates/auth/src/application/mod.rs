//! Application layer: use cases and session services

pub mod audit;
pub mod config;
pub mod ledger;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod token;
pub mod validate;

pub use audit::AuditRecorder;
pub use config::AuthConfig;
pub use ledger::RefreshLedger;
pub use login::{LoginInput, LoginUseCase, SessionOutput};
pub use logout::LogoutUseCase;
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{AccessClaims, TokenIssuer};
pub use validate::ValidateAccessUseCase;
