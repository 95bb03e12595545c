use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("stored credential is not a valid hash record")]
    MalformedHash,

    #[error("unsupported hash record version: {0}")]
    UnsupportedVersion(u32),

    #[error("hash record contains invalid base64: {0}")]
    InvalidEncoding(String),

    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("secure random source failed: {0}")]
    RandomSource(String),
}
