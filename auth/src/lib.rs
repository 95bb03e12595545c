//! Authentication library
//!
//! Provides the credential and session-token subsystem used by the
//! account service:
//! - Password hashing (Argon2id) with a self-describing encoded record
//! - RSA-signed bearer tokens with a fixed validity window
//! - Signing-key loading from PEM files
//! - An authenticator coordinating the two around one key pair
//!
//! Storage and transport stay outside this crate; services adapt these
//! implementations behind their own ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::password::HashParams;
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let params = HashParams { memory_cost: 1024, time_cost: 1, parallelism: 1, salt_length: 16, output_length: 32 };
//! let record = hasher.derive("my_password", &params).unwrap();
//! assert!(record.starts_with("$argon2id$v=19$"));
//! assert!(hasher.verify("my_password", &record).unwrap());
//! ```
//!
//! ## Tokens
//! ```no_run
//! use std::sync::Arc;
//!
//! use auth::Authenticator;
//! use auth::KeyPair;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = Arc::new(KeyPair::from_pem_files("keys/private-key.pem", "keys/public-key.pem")?);
//! let auth = Authenticator::new(keys);
//!
//! let token = auth.issue_token("alice")?;
//! // Five seconds later, once the token has activated:
//! let claims = auth.validate_token(&token)?;
//! assert_eq!(claims.aud, "alice");
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::KeyError;
pub use jwt::KeyPair;
pub use password::PasswordError;
pub use password::PasswordHasher;
