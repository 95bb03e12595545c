use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::EmailError;
use crate::account::errors::IdentifierError;

/// Account aggregate entity.
///
/// Represents a registered account. The credential lives in
/// `password_hash` as a self-describing encoded record; a password
/// change replaces the whole record, it is never edited in place.
#[derive(Debug, Clone)]
pub struct Account {
    pub identifier: Identifier,
    pub email: EmailAddress,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account handle value type
///
/// Allows only ASCII alphanumerics and underscore, and normalizes to
/// lowercase so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Create a new valid identifier.
    ///
    /// # Arguments
    /// * `identifier` - Raw identifier string
    ///
    /// # Errors
    /// * `Empty` - Identifier is empty
    /// * `InvalidCharacters` - Contains characters outside `[a-zA-Z0-9_]`
    pub fn new(identifier: &str) -> Result<Self, IdentifierError> {
        if identifier.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if !identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(IdentifierError::InvalidCharacters);
        }
        Ok(Self(identifier.to_ascii_lowercase()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterAccountCommand {
    pub identifier: Identifier,
    pub email: EmailAddress,
    pub display_name: String,
    pub password: String,
}

impl RegisterAccountCommand {
    pub fn new(
        identifier: Identifier,
        email: EmailAddress,
        display_name: String,
        password: String,
    ) -> Self {
        Self {
            identifier,
            email,
            display_name,
            password,
        }
    }
}

/// Result of a successful login: the canonical identifier and a signed
/// bearer token whose audience is that identifier.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identifier: Identifier,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_accepts_handle_characters() {
        let identifier = Identifier::new("alice_01").unwrap();
        assert_eq!(identifier.as_str(), "alice_01");
    }

    #[test]
    fn test_identifier_is_lowercased() {
        let identifier = Identifier::new("Alice").unwrap();
        assert_eq!(identifier.as_str(), "alice");
    }

    #[test]
    fn test_identifier_rejects_invalid_characters() {
        assert_eq!(
            Identifier::new("bad id!"),
            Err(IdentifierError::InvalidCharacters)
        );
        assert_eq!(
            Identifier::new("alice@example.com"),
            Err(IdentifierError::InvalidCharacters)
        );
    }

    #[test]
    fn test_identifier_rejects_empty() {
        assert_eq!(Identifier::new(""), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }
}
