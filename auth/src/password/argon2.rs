use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Salt used when burning a verification for an account that does not exist.
const DUMMY_SALT: &str = "ZHVtbXlzYWx0Zm9ydGltaW5n";

/// Password hashing implementation.
///
/// Argon2id with cost parameters fixed at construction. Hashes are PHC strings,
/// so every stored hash carries its own salt and cost; raising the cost later
/// does not invalidate hashes produced under the old parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a password hasher with the crate's default Argon2id parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Create a password hasher with explicit Argon2id cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParams` - Parameters are outside the ranges Argon2 accepts
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The cost parameters are read from the stored hash. Digest comparison is
    /// constant-time. A malformed hash yields `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::debug!("Stored password hash could not be parsed");
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spend the same work as a real verification without a stored hash.
    ///
    /// Used when the account does not exist so that response timing does not
    /// reveal which usernames are registered.
    pub fn verify_dummy(&self, password: &str) {
        if let Ok(salt) = SaltString::from_b64(DUMMY_SALT) {
            let _ = self.argon2.hash_password(password.as_bytes(), &salt);
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).expect("valid params")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();

        let first = hasher.hash("pass_word!").unwrap();
        let second = hasher.hash("pass_word!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("pass_word!", &first));
        assert!(hasher.verify("pass_word!", &second));
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = cheap_hasher().hash("pass_word!").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_verify_malformed_hash_returns_false() {
        let hasher = cheap_hasher();

        assert!(!hasher.verify("password", "invalid_hash"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$argon2id$v=19$m=1024,t=1,p=1$bad"));
    }

    #[test]
    fn test_verify_uses_cost_embedded_in_hash() {
        let old = PasswordHasher::with_params(1024, 1, 1).unwrap();
        let new = PasswordHasher::with_params(2048, 2, 1).unwrap();

        let hash = old.hash("pass_word!").unwrap();

        assert!(new.verify("pass_word!", &hash));
        assert!(!new.verify("other", &hash));
    }

    #[test]
    fn test_with_params_rejects_invalid_cost() {
        let result = PasswordHasher::with_params(1024, 0, 1);
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        cheap_hasher().verify_dummy("anything");
    }
}
