use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier must not be empty")]
    Empty,

    #[error("Identifier contains invalid characters (only a-z, A-Z, 0-9 and underscore allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Domain-level errors
    #[error("Identifier already exists: {0}")]
    IdentifierTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    // Covers both unknown identifier and wrong password, so the caller
    // cannot probe which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
