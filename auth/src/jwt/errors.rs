use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("failed to sign token: {0}")]
    SigningFailed(String),

    #[error("token was not signed with the expected algorithm")]
    AlgorithmMismatch,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token is expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),
}
