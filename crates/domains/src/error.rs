//! # DomainError
//!
//! Centralized error handling for the blog list service.
//! Every failure a request can hit is one of these closed variants; the HTTP
//! layer matches on them exhaustively to pick a status code.

use thiserror::Error;

/// Failures raised by the token service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token was carried by the request.
    #[error("token missing")]
    Missing,

    /// Bad signature, malformed payload, or a payload without a user id.
    #[error("token invalid")]
    Invalid,

    /// Issued-at plus TTL lies in the past.
    #[error("token expired")]
    Expired,

    /// The signer refused to produce a token.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Failures raised by the credential service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password missing")]
    Missing,

    #[error("password too short")]
    TooShort,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad or missing input shape (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// An identifier that does not parse as the repository key type (HTTP 400).
    #[error("malformatted id")]
    MalformedIdentifier(String),

    /// No identity, or an invalid one, where one is required (HTTP 401).
    #[error("{0}")]
    Authentication(String),

    /// A valid identity that is not permitted to act (HTTP 403).
    #[error("{0}")]
    Authorization(String),

    /// Well-formed id with no matching entity (HTTP 404).
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Aggregation over an empty collection. A caller contract violation.
    #[error("cannot compute {0} of an empty collection")]
    EmptyInput(&'static str),

    /// Infrastructure failure inside a repository adapter.
    #[error("repository error: {0}")]
    Repository(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => Self::Internal(msg),
            other => Self::Authentication(other.to_string()),
        }
    }
}

impl From<CredentialError> for DomainError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Hashing(msg) => Self::Internal(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_become_authentication_errors() {
        assert_eq!(
            DomainError::from(TokenError::Invalid),
            DomainError::Authentication("token invalid".into())
        );
        assert_eq!(
            DomainError::from(TokenError::Expired),
            DomainError::Authentication("token expired".into())
        );
        assert!(matches!(
            DomainError::from(TokenError::Signing("bad key".into())),
            DomainError::Internal(_)
        ));
    }

    #[test]
    fn credential_policy_failures_are_validation_errors() {
        assert_eq!(
            DomainError::from(CredentialError::TooShort),
            DomainError::Validation("password too short".into())
        );
        assert!(matches!(
            DomainError::from(CredentialError::Hashing("oom".into())),
            DomainError::Internal(_)
        ));
    }
}
