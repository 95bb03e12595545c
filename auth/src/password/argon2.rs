use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Version;
use subtle::ConstantTimeEq;

use super::codec;
use super::codec::HashParams;
use super::codec::HashRecord;
use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Derives Argon2id keys and stores them in a self-describing encoded
/// record, so that work-factor defaults can change without invalidating
/// credentials derived under older parameters.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with the default parameters.
    ///
    /// # Errors
    /// * `RandomSource` - The OS random source failed
    /// * `HashingFailed` - Key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.derive(password, &HashParams::default())
    }

    /// Hash a plaintext password with explicit work-factor parameters.
    ///
    /// Generates a fresh random salt of `params.salt_length` bytes per
    /// call. The parameters actually used are embedded in the returned
    /// record.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    /// * `params` - Work-factor parameters for this derivation
    ///
    /// # Returns
    /// Encoded hash record (algorithm tag, version, parameters, salt, hash)
    ///
    /// # Errors
    /// * `RandomSource` - The OS random source failed; there is no fallback
    /// * `HashingFailed` - Key derivation failed or parameters are out of range
    pub fn derive(&self, password: &str, params: &HashParams) -> Result<String, PasswordError> {
        let mut salt = vec![0u8; params.salt_length as usize];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomSource(e.to_string()))?;

        let hash = derive_key(password.as_bytes(), &salt, params)?;

        Ok(codec::encode(&HashRecord {
            version: codec::FORMAT_VERSION,
            params: *params,
            salt,
            hash,
        }))
    }

    /// Verify a password against a stored encoded record.
    ///
    /// Recomputes the key with the record's own parameters and compares
    /// the result in constant time. A mismatch is `Ok(false)`, not an
    /// error; errors are reserved for malformed records.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `encoded` - Stored hash record
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash`, `UnsupportedVersion`, `InvalidEncoding` - The record does not decode
    /// * `HashingFailed` - Key derivation failed
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let record = codec::decode(encoded)?;

        let other_hash = derive_key(password.as_bytes(), &record.salt, &record.params)?;

        Ok(record.hash.ct_eq(&other_hash).into())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_key(
    password: &[u8],
    salt: &[u8],
    params: &HashParams,
) -> Result<Vec<u8>, PasswordError> {
    let output_length = params.output_length as usize;
    let params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(output_length),
    )
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = vec![0u8; output_length];
    argon2
        .hash_password_into(password, salt, &mut out)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low-cost parameters so the derivation-heavy tests stay fast.
    fn test_params() -> HashParams {
        HashParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            salt_length: 16,
            output_length: 32,
        }
    }

    #[test]
    fn test_derive_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let encoded = hasher
            .derive(password, &test_params())
            .expect("Failed to derive");

        assert!(hasher
            .verify(password, &encoded)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &encoded)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_uses_default_params() {
        let hasher = PasswordHasher::new();

        let encoded = hasher
            .hash("correct-horse-battery-staple")
            .expect("Failed to hash");

        assert!(encoded.starts_with("$argon2id$v=19$m=65536,t=3,p=2$"));
        assert_eq!(encoded.split('$').count(), 6);
    }

    #[test]
    fn test_salts_are_unique_per_derivation() {
        let hasher = PasswordHasher::new();
        let params = test_params();

        let first = hasher.derive("password", &params).expect("Failed to derive");
        let second = hasher.derive("password", &params).expect("Failed to derive");

        assert_ne!(first, second);

        let first = codec::decode(&first).unwrap();
        let second = codec::decode(&second).unwrap();
        assert_ne!(first.salt, second.salt);
    }

    #[test]
    fn test_verify_uses_record_params_not_defaults() {
        let hasher = PasswordHasher::new();
        let params = HashParams {
            memory_cost: 2048,
            time_cost: 2,
            parallelism: 1,
            salt_length: 16,
            output_length: 32,
        };

        let encoded = hasher.derive("password", &params).expect("Failed to derive");

        let record = codec::decode(&encoded).unwrap();
        assert_eq!(record.params.memory_cost, 2048);
        assert_eq!(record.params.time_cost, 2);
        assert_eq!(record.params.parallelism, 1);

        // A record derived under non-default parameters still verifies.
        assert!(hasher
            .verify("password", &encoded)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_verify_malformed_record() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert_eq!(result, Err(PasswordError::MalformedHash));
    }
}
