//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG, URL-safe Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Client request context (device binding, origin IP)

pub mod client;
pub mod crypto;
pub mod password;
