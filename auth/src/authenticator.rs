use std::sync::Arc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::KeyPair;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token
/// issuance around one injected key pair.
///
/// Holds no per-request state; a single instance serves the whole
/// process.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

impl Authenticator {
    /// Create a new authenticator around a loaded signing key pair.
    pub fn new(keys: Arc<KeyPair>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(keys),
        }
    }

    /// Hash a password for storage, using the default work factors.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash record.
    ///
    /// A mismatch is `Ok(false)`; errors mean the stored record itself
    /// is unusable.
    ///
    /// # Errors
    /// * `PasswordError` - The stored record does not decode or hashing failed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue a signed bearer token for an authenticated identity.
    ///
    /// # Errors
    /// * `JwtError` - Signing failed
    pub fn issue_token(&self, identity: &str) -> Result<String, JwtError> {
        self.jwt_handler.issue(identity)
    }

    /// Validate a presented bearer token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - The token is malformed, mis-signed, or outside its window
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::HashParams;

    const PRIVATE_PEM: &[u8] = include_bytes!("../testdata/private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../testdata/public.pem");

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(KeyPair::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap()))
    }

    #[test]
    fn test_password_round_trip() {
        let authenticator = authenticator();

        let params = HashParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            salt_length: 16,
            output_length: 32,
        };
        let hash = PasswordHasher::new()
            .derive("my_password", &params)
            .expect("Failed to hash password");

        assert!(authenticator
            .verify_password("my_password", &hash)
            .expect("Failed to verify password"));
        assert!(!authenticator
            .verify_password("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_issue_token_carries_identity() {
        let authenticator = authenticator();

        let token = authenticator
            .issue_token("alice")
            .expect("Failed to issue token");

        // The token activates a few seconds after issuance.
        assert_eq!(
            authenticator.validate_token(&token),
            Err(JwtError::NotYetValid)
        );
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let authenticator = authenticator();
        assert!(authenticator.validate_token("invalid.token.here").is_err());
    }
}
