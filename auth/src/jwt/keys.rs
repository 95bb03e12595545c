use std::path::Path;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use thiserror::Error;

/// Error type for key loading.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Unavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse key material: {0}")]
    Malformed(String),
}

/// The process-wide RSA signing key pair.
///
/// Loaded once at startup and injected where needed; immutable for the
/// process lifetime, so it is safe for unlimited concurrent readers and
/// is never re-parsed per request.
pub struct KeyPair {
    pub(crate) encoding: EncodingKey,
    pub(crate) decoding: DecodingKey,
}

impl KeyPair {
    /// Load and parse the key pair from two PEM files.
    ///
    /// # Arguments
    /// * `private_key_path` - PEM file holding the RSA private key
    /// * `public_key_path` - PEM file holding the RSA public key
    ///
    /// # Errors
    /// * `Unavailable` - A key file could not be read
    /// * `Malformed` - A key file could not be parsed as RSA PEM
    pub fn from_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let private_pem = read_key_file(private_key_path.as_ref())?;
        let public_pem = read_key_file(public_key_path.as_ref())?;
        Self::from_pem(&private_pem, &public_pem)
    }

    /// Parse the key pair from in-memory PEM bytes.
    ///
    /// # Errors
    /// * `Malformed` - The bytes could not be parsed as RSA PEM
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| KeyError::Malformed(e.to_string()))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| KeyError::Malformed(e.to_string()))?;

        Ok(Self { encoding, decoding })
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, KeyError> {
    std::fs::read(path).map_err(|source| KeyError::Unavailable {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../testdata/private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../testdata/public.pem");

    #[test]
    fn test_from_pem() {
        assert!(KeyPair::from_pem(PRIVATE_PEM, PUBLIC_PEM).is_ok());
    }

    #[test]
    fn test_from_pem_files() {
        let result = KeyPair::from_pem_files(
            concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/private.pem"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/public.pem"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = KeyPair::from_pem_files("/nonexistent/private.pem", "/nonexistent/public.pem");
        assert!(matches!(result, Err(KeyError::Unavailable { .. })));
    }

    #[test]
    fn test_garbage_pem_is_malformed() {
        let result = KeyPair::from_pem(b"not a key", PUBLIC_PEM);
        assert!(matches!(result, Err(KeyError::Malformed(_))));
    }
}
