use std::sync::Arc;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::keys::KeyPair;

/// Signature algorithm for every issued and accepted token.
const SIGNING_ALGORITHM: Algorithm = Algorithm::RS512;

/// Token issuer and verifier.
///
/// Signs with the private half of the injected key pair and verifies
/// with the public half. Only RS512 tokens are accepted: a token whose
/// header declares any other algorithm is rejected before signature
/// verification, closing off algorithm-confusion attacks.
pub struct JwtHandler {
    keys: Arc<KeyPair>,
    validation: Validation,
}

impl JwtHandler {
    /// Create a handler around a loaded key pair.
    pub fn new(keys: Arc<KeyPair>) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // The window is checked exactly: valid within [nbf, exp).
        validation.leeway = 0;
        validation.validate_nbf = true;
        // The audience carries the account identifier and is handed back
        // to the caller rather than matched against a fixed set.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf", "aud"]);

        Self { keys, validation }
    }

    /// Issue a signed token for an authenticated identity.
    ///
    /// Claims carry the fixed validity window from [`Claims::for_identity`].
    ///
    /// # Errors
    /// * `SigningFailed` - Signing failed; never retried here
    pub fn issue(&self, identity: &str) -> Result<String, JwtError> {
        self.encode(&Claims::for_identity(identity))
    }

    /// Sign caller-built claims.
    ///
    /// # Errors
    /// * `SigningFailed` - Signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.keys.encoding)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Validate a presented token and return its claims.
    ///
    /// A single pass with terminal rejects: parse, algorithm check,
    /// signature check, window check.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Header algorithm is not RS512
    /// * `InvalidSignature` - Signature does not verify with the public key
    /// * `NotYetValid` - Current time is before `nbf`
    /// * `Expired` - Current time is at or past `exp`
    /// * `Malformed` - The token does not parse or lacks required claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    JwtError::AlgorithmMismatch
                }
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ImmatureSignature => JwtError::NotYetValid,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            })
    }

    /// Decode token claims without any validation.
    ///
    /// # Security Warning
    /// This does NOT validate the signature or the time window. Only use
    /// for debugging, logging, or inspecting claims before full
    /// validation. Never trust claims from this method for authorization
    /// decisions.
    ///
    /// # Errors
    /// * `Malformed` - The token does not parse
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::EncodingKey;

    use super::*;
    use crate::jwt::claims::ACTIVATION_DELAY_SECS;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../testdata/private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../testdata/public.pem");
    const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../../testdata/other_private.pem");
    const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("../../testdata/other_public.pem");

    fn handler() -> JwtHandler {
        JwtHandler::new(Arc::new(KeyPair::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap()))
    }

    fn claims_with_window(nbf_offset: i64, exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            aud: "alice".to_string(),
            exp: now + exp_offset,
            iat: now - 10,
            nbf: now + nbf_offset,
        }
    }

    #[test]
    fn test_verify_within_window() {
        let handler = handler();

        let token = handler
            .encode(&claims_with_window(-5, 60))
            .expect("Failed to encode token");
        let claims = handler.verify(&token).expect("Failed to verify token");

        assert_eq!(claims.aud, "alice");
    }

    #[test]
    fn test_issued_token_is_not_valid_before_activation() {
        let handler = handler();

        // Freshly issued tokens activate a few seconds in the future, so
        // an immediate verification is rejected.
        let token = handler.issue("alice").expect("Failed to issue token");
        assert_eq!(handler.verify(&token), Err(JwtError::NotYetValid));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let handler = handler();

        let token = handler
            .encode(&claims_with_window(-120, -60))
            .expect("Failed to encode token");
        assert_eq!(handler.verify(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let issuing = handler();
        let verifying = JwtHandler::new(Arc::new(
            KeyPair::from_pem(OTHER_PRIVATE_PEM, OTHER_PUBLIC_PEM).unwrap(),
        ));

        let token = issuing
            .encode(&claims_with_window(-5, 60))
            .expect("Failed to encode token");
        assert_eq!(verifying.verify(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_symmetric_algorithm_is_rejected() {
        let handler = handler();

        // A token signed under HS256 must never be accepted, whatever its
        // signature, because the verification key would double as a
        // symmetric secret.
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims_with_window(-5, 60),
            &EncodingKey::from_secret(b"attacker-controlled-secret"),
        )
        .expect("Failed to encode token");

        assert_eq!(handler.verify(&token), Err(JwtError::AlgorithmMismatch));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let handler = handler();

        let token = handler
            .encode(&claims_with_window(-5, 60))
            .expect("Failed to encode token");

        let (rest, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", rest, flipped, &signature[1..]);

        assert_eq!(handler.verify(&tampered), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let handler = handler();
        assert!(matches!(
            handler.verify("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_unverified_reads_claims() {
        let handler = handler();

        let token = handler.issue("alice").expect("Failed to issue token");
        let claims = handler
            .decode_unverified(&token)
            .expect("Failed to decode claims");

        assert_eq!(claims.aud, "alice");
        assert_eq!(claims.nbf - claims.iat, ACTIVATION_DELAY_SECS);
    }
}
