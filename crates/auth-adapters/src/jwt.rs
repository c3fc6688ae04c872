//! HS256 JWT implementation of `TokenService`.

use chrono::{DateTime, Duration, Utc};
use domains::{IdentityClaims, TokenError, TokenService, UserId};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire payload. Every field is optional on the way in so that a token with
/// the wrong claim shape is reported as invalid rather than as a decode error.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default)]
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

/// Stateless tokens signed with a process-wide secret. Validity depends only
/// on the signature and, when a TTL is configured, on `exp`.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    fn claims_for(&self, user_id: UserId, username: &str, now: DateTime<Utc>) -> Claims {
        Claims {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId, username: &str) -> Result<String, TokenError> {
        let claims = self.claims_for(user_id, username, Utc::now());
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "token failed verification");
                    TokenError::Invalid
                }
            }
        })?;
        let claims = data.claims;

        // A valid signature over the wrong claim shape is still not an identity.
        let user_id = claims
            .id
            .as_deref()
            .ok_or(TokenError::Invalid)?
            .parse::<UserId>()
            .map_err(|_| TokenError::Invalid)?;
        let username = claims.username.ok_or(TokenError::Invalid)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;

        Ok(IdentityClaims {
            user_id,
            username,
            issued_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    fn sign_raw(claims: &Claims, secret: &[u8]) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn issued_tokens_verify_to_the_same_identity() {
        let service = JwtTokenService::new(SECRET, None);
        let id = UserId::generate();

        let token = service.issue(id, "xyz").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id, id);
        assert_eq!(claims.username, "xyz");
    }

    #[test]
    fn repeated_issues_differ() {
        let service = JwtTokenService::new(SECRET, None);
        let id = UserId::generate();
        assert_ne!(service.issue(id, "xyz").unwrap(), service.issue(id, "xyz").unwrap());
    }

    #[test]
    fn foreign_signatures_are_invalid() {
        let ours = JwtTokenService::new(SECRET, None);
        let theirs = JwtTokenService::new(b"another-secret", None);
        let token = theirs.issue(UserId::generate(), "root").unwrap();

        assert_eq!(ours.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn garbage_and_empty_tokens() {
        let service = JwtTokenService::new(SECRET, None);
        assert_eq!(service.verify("not.a.jwt").unwrap_err(), TokenError::Invalid);
        assert_eq!(service.verify("").unwrap_err(), TokenError::Missing);
    }

    #[test]
    fn signed_token_without_user_id_is_invalid() {
        let service = JwtTokenService::new(SECRET, None);
        let token = sign_raw(
            &Claims {
                id: None,
                username: Some("root".into()),
                iat: Utc::now().timestamp(),
                exp: None,
                jti: None,
            },
            SECRET,
        );
        assert_eq!(service.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn expired_tokens_are_reported_as_expired() {
        let service = JwtTokenService::new(SECRET, Some(Duration::seconds(60)));
        let issued = Utc::now() - Duration::seconds(3600);
        let token = sign_raw(&service.claims_for(UserId::generate(), "root", issued), SECRET);

        assert_eq!(service.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tokens_within_ttl_verify() {
        let service = JwtTokenService::new(SECRET, Some(Duration::seconds(3600)));
        let token = service.issue(UserId::generate(), "root").unwrap();
        assert!(service.verify(&token).is_ok());
    }
}
