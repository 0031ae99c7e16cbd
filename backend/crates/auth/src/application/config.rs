//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Lifetime of a session that has not logged in yet (1 day)
    pub anonymous_session_ttl: Duration,
    /// Lifetime of a login state nonce (10 minutes)
    pub state_ttl: Duration,
    /// Upper bound on each identity provider round trip
    pub provider_timeout: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy; must allow the cross-site callback redirect
    pub cookie_same_site: SameSite,
    /// Take the client address from `X-Forwarded-For`
    pub trust_forwarded_for: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "vote_session".to_string(),
            session_secret: [0u8; 32],
            anonymous_session_ttl: Duration::from_secs(24 * 3600),
            state_ttl: Duration::from_secs(10 * 60),
            provider_timeout: Duration::from_secs(10),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            trust_forwarded_for: false,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie settings for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }

    pub fn anonymous_session_ttl(&self) -> AuthResult<chrono::Duration> {
        to_chrono(self.anonymous_session_ttl)
    }

    pub fn state_ttl(&self) -> AuthResult<chrono::Duration> {
        to_chrono(self.state_ttl)
    }
}

fn to_chrono(duration: Duration) -> AuthResult<chrono::Duration> {
    chrono::Duration::from_std(duration)
        .map_err(|e| AuthError::Internal(format!("Invalid auth TTL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.state_ttl, Duration::from_secs(600));
        assert!(config.cookie_secure);
        assert!(!config.trust_forwarded_for);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
    }

    #[test]
    fn test_random_secret() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.session_secret, [0u8; 32]);
        assert_ne!(a.session_secret, b.session_secret);
    }

    #[test]
    fn test_cookie_config() {
        let config = AuthConfig::development();
        let cookie = config.cookie_config();
        assert_eq!(cookie.name, "vote_session");
        assert!(!cookie.secure);
        assert_eq!(config.state_ttl().unwrap(), chrono::Duration::minutes(10));
    }
}
