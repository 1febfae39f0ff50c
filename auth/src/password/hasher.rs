use sha2::Digest;
use sha2::Sha256;

use super::errors::PasswordError;

/// Prefixes identifying a modern (bcrypt) hash string.
const MODERN_PREFIXES: [&str; 2] = ["$2a$", "$2b$"];

/// Password hashing with legacy-scheme support.
///
/// New hashes are always produced with bcrypt. Verification dispatches on
/// the scheme marker at the start of the stored hash: `$2a$`/`$2b$` is
/// bcrypt, anything else is treated as the legacy `salt:hexdigest`
/// (SHA-256) format being phased out. The scheme is never guessed by
/// trial-and-error.
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the default bcrypt cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost factor.
    ///
    /// Lower costs are useful in tests; production code should keep the
    /// default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password with bcrypt.
    ///
    /// # Returns
    /// A self-describing `$2b$...` hash string (algorithm, cost, salt,
    /// digest).
    ///
    /// # Errors
    /// * `HashingFailed` - bcrypt rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Modern hashes are verified with bcrypt; legacy hashes by
    /// recomputing `sha256(password + salt)`. A legacy hash that does not
    /// parse verifies as false rather than erroring, so a corrupt stored
    /// value fails closed.
    ///
    /// # Errors
    /// * `VerificationFailed` - the stored bcrypt hash is malformed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_modern(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::VerificationFailed(e.to_string()));
        }
        Ok(Self::verify_legacy(password, hash))
    }

    /// Whether a stored hash should be re-hashed with the modern scheme.
    pub fn needs_rehash(hash: &str) -> bool {
        !Self::is_modern(hash)
    }

    fn is_modern(hash: &str) -> bool {
        MODERN_PREFIXES.iter().any(|p| hash.starts_with(p))
    }

    /// Verify against the legacy `salt:hexdigest` SHA-256 format.
    fn verify_legacy(password: &str, hash: &str) -> bool {
        let parts: Vec<&str> = hash.split(':').collect();
        if parts.len() != 2 {
            return false;
        }
        let (salt, digest) = (parts[0], parts[1]);

        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(salt.as_bytes());
        hex::encode(hasher.finalize()) == digest.to_lowercase()
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

    // Keep bcrypt cheap in tests; cost has no bearing on the logic here.
    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    fn legacy_hash(password: &str, salt: &str) -> String {
        let mut h = Sha256::new();
        h.update(password.as_bytes());
        h.update(salt.as_bytes());
        format!("{}:{}", salt, hex::encode(h.finalize()))
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("my_secure_password").expect("hash failed");

        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("my_secure_password", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_distinct_passwords_do_not_cross_verify() {
        let hasher = hasher();
        let hash_p = hasher.hash("passwordP1").unwrap();
        let hash_q = hasher.hash("passwordQ2").unwrap();

        assert!(hasher.verify("passwordP1", &hash_p).unwrap());
        assert!(!hasher.verify("passwordP1", &hash_q).unwrap());
    }

    #[test]
    fn test_verify_legacy_hash() {
        let hasher = hasher();
        let stored = legacy_hash("OldPassword1", "somesalt");

        assert!(hasher.verify("OldPassword1", &stored).unwrap());
        assert!(!hasher.verify("WrongPassword1", &stored).unwrap());
    }

    #[test]
    fn test_unparseable_legacy_hash_fails_closed() {
        let hasher = hasher();

        assert!(!hasher.verify("password", "no-separator-here").unwrap());
        assert!(!hasher.verify("password", "too:many:parts").unwrap());
        assert!(!hasher.verify("password", "").unwrap());
    }

    #[test]
    fn test_needs_rehash() {
        let hasher = hasher();
        let modern = hasher.hash("Password1").unwrap();
        let legacy = legacy_hash("Password1", "salt");

        assert!(!PasswordHasher::needs_rehash(&modern));
        assert!(PasswordHasher::needs_rehash(&legacy));
    }

    #[test]
    fn test_verify_malformed_bcrypt_hash_errors() {
        let hasher = hasher();
        let result = hasher.verify("password", "$2b$not-a-real-hash");
        assert!(result.is_err());
    }
}
