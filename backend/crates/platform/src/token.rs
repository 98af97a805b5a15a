//! Signed Token Issuance and Verification
//!
//! Tamper-evident bearer tokens (JWT, HS256) carrying subject, issuer,
//! issued-at, expiry, and a unique token id (`jti`). The `jti` doubles as
//! the session key in the session store, so a token can be revoked before
//! its natural expiry by deleting the corresponding session record.
//!
//! Verification pins the issuer and uses zero clock leeway: a token is
//! rejected the instant its `exp` elapses. Signature failures and expiry
//! failures are deliberately indistinguishable to callers.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Required signing secret length in bytes
pub const TOKEN_SECRET_LEN: usize = 32;

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature invalid, token expired, malformed, or wrong issuer.
    /// One variant on purpose: which check failed must not leak.
    #[error("Token is invalid or expired")]
    Invalid,

    /// Signing failed (key or serialization problem)
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Registered claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: String,
    /// Issuer name
    pub iss: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
    /// Unique token id, also the session key
    pub jti: String,
}

impl Claims {
    /// Parse the subject as a user UUID
    pub fn subject(&self) -> Result<Uuid, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }

    /// Expiry as a UTC instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// An issued token together with its claims
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// Compact JWT string handed to the client
    pub token: String,
    /// Claims embedded in the token
    pub claims: Claims,
}

/// Issues and verifies signed tokens with a server-held secret
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    validation: Validation,
}

impl TokenSigner {
    /// Create a signer from a secret and an issuer name
    ///
    /// The secret comes from configuration and must be at least
    /// [`TOKEN_SECRET_LEN`] bytes; rotating it invalidates all
    /// outstanding tokens.
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Result<Self, TokenError> {
        if secret.len() < TOKEN_SECRET_LEN {
            return Err(TokenError::Signing(format!(
                "signing secret must be at least {TOKEN_SECRET_LEN} bytes"
            )));
        }

        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer,
            validation,
        })
    }

    /// Issuer name baked into every token
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a signed token for `subject` expiring at `expires_at`
    pub fn issue(
        &self,
        subject: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(SignedToken { token, claims })
    }

    /// Verify signature and expiry, returning the claims
    ///
    /// All failures collapse into [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signer() -> TokenSigner {
        TokenSigner::new(&[7u8; 32], "test-issuer").unwrap()
    }

    #[test]
    fn test_secret_too_short() {
        assert!(TokenSigner::new(b"short", "test-issuer").is_err());
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let signer = signer();
        let subject = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(48);

        let issued = signer.issue(subject, expires_at).unwrap();
        let claims = signer.verify(&issued.token).unwrap();

        assert_eq!(claims.subject().unwrap(), subject);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.jti, issued.claims.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let issued = signer
            .issue(Uuid::new_v4(), Utc::now() - Duration::minutes(1))
            .unwrap();

        assert!(matches!(
            signer.verify(&issued.token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = signer();
        let issued = signer
            .issue(Uuid::new_v4(), Utc::now() + Duration::hours(1))
            .unwrap();

        let mut tampered = issued.token.clone();
        tampered.pop();
        tampered.push('A');

        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let issued = signer()
            .issue(Uuid::new_v4(), Utc::now() + Duration::hours(1))
            .unwrap();

        let other = TokenSigner::new(&[9u8; 32], "test-issuer").unwrap();
        assert!(other.verify(&issued.token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let other = TokenSigner::new(&[7u8; 32], "someone-else").unwrap();
        let issued = other
            .issue(Uuid::new_v4(), Utc::now() + Duration::hours(1))
            .unwrap();

        // Same key, different issuer claim
        assert!(signer().verify(&issued.token).is_err());
    }

    #[test]
    fn test_fresh_jti_per_token() {
        let signer = signer();
        let subject = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let first = signer.issue(subject, expires_at).unwrap();
        let second = signer.issue(subject, expires_at).unwrap();

        assert_ne!(first.claims.jti, second.claims.jti);
    }
}
