//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::token::{TokenError, TokenSigner};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for token signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Issuer claim stamped on every token
    pub issuer: String,
    /// Session lifetime (48 hours)
    pub session_ttl: Duration,
    /// Deadline for a single session-store call
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    /// Baseline for struct-update syntax. The secret is all zeroes and
    /// [`AuthConfig::signer`] refuses it, so a caller must supply a real
    /// secret (or use [`AuthConfig::with_random_secret`]) before signing.
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            issuer: "flexchat".to_string(),
            session_ttl: Duration::from_secs(48 * 3600), // 48 hours
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Build the token signer from this configuration
    ///
    /// The placeholder all-zero secret from [`Default`] is rejected; it is
    /// a predictable key, not a usable one.
    pub fn signer(&self) -> Result<TokenSigner, TokenError> {
        if self.token_secret == [0u8; 32] {
            return Err(TokenError::Signing(
                "signing secret is unset; supply one via configuration".to_string(),
            ));
        }
        TokenSigner::new(&self.token_secret, &self.issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl, Duration::from_secs(48 * 3600));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.token_secret, b.token_secret);
    }

    #[test]
    fn test_signer_builds() {
        assert!(AuthConfig::with_random_secret().signer().is_ok());
    }

    #[test]
    fn test_placeholder_secret_cannot_sign() {
        assert!(AuthConfig::default().signer().is_err());
    }
}
