//! Argon2id implementation of `CredentialHasher`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use domains::{CredentialError, CredentialHash, CredentialHasher, MIN_PASSWORD_LENGTH};

/// Hashes passwords into PHC strings (`$argon2id$v=19$...`) with a fresh
/// random salt per call. Verification reads the parameters back out of the
/// stored hash, so changing them does not invalidate existing users.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Custom cost parameters. Tests use tiny values to stay fast.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::TooShort);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        Ok(CredentialHash::new(hash.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> bool {
        let parsed = match PasswordHash::new(hash.as_str()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "stored credential hash is unparsable");
                return false;
            }
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::with_params(256, 1, 1).unwrap()
    }

    #[test]
    fn hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("sekret").unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("sekret", &hash));
        assert!(!hasher.verify("Sekret", &hash));
    }

    #[test]
    fn salts_differ_between_calls() {
        let hasher = hasher();
        let a = hasher.hash("sekret").unwrap();
        let b = hasher.hash("sekret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_and_empty_passwords_are_rejected() {
        let hasher = hasher();
        assert_eq!(hasher.hash("ab").unwrap_err(), CredentialError::TooShort);
        assert_eq!(hasher.hash("").unwrap_err(), CredentialError::TooShort);
        assert!(hasher.hash("abc").is_ok());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!hasher().verify("sekret", &CredentialHash::new("not-a-phc-string")));
    }

    #[test]
    fn invalid_params_are_reported() {
        assert!(matches!(
            Argon2CredentialHasher::with_params(1, 0, 1),
            Err(CredentialError::Hashing(_))
        ));
    }
}
