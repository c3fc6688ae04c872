//! # auth-adapters
//!
//! Implementations of the credential and token ports.
//!
//! - [`Argon2CredentialHasher`]: Argon2id password hashing, always compiled.
//! - [`JwtTokenService`]: HS256 identity tokens, behind the `auth-jwt` feature.

mod argon;
#[cfg(feature = "auth-jwt")]
mod jwt;

pub use argon::Argon2CredentialHasher;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
