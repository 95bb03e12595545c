use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Seconds between issuance and expiry. Tokens are short-lived and
/// self-contained; there is no refresh or revocation.
pub const TOKEN_LIFETIME_SECS: i64 = 5 * 60;

/// Seconds between issuance and the start of validity, absorbing clock
/// skew between issuing and verifying hosts.
pub const ACTIVATION_DELAY_SECS: i64 = 5;

/// Claims carried by every issued token.
///
/// The audience is the authenticated account identifier; validity is
/// entirely described by the embedded window, so no server-side session
/// state exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Audience (account identifier)
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Build claims for a freshly authenticated identity.
    ///
    /// The window is fixed: valid from five seconds after issuance until
    /// five minutes after issuance.
    pub fn for_identity(identity: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            aud: identity.to_string(),
            exp: now + TOKEN_LIFETIME_SECS,
            iat: now,
            nbf: now + ACTIVATION_DELAY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_identity_window() {
        let claims = Claims::for_identity("alice");

        assert_eq!(claims.aud, "alice");
        assert_eq!(claims.nbf - claims.iat, ACTIVATION_DELAY_SECS);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
        assert!(claims.nbf >= claims.iat);
        assert!(claims.exp > claims.nbf);
    }
}
