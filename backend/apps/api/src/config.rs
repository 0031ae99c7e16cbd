//! Server Configuration
//!
//! Read from the environment (and `.env`) once at startup.

use anyhow::{Context, bail};
use auth::{AuthConfig, OidcProviderConfig};
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Startup configuration of the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
    /// Google login, when its credentials are configured
    pub google: Option<OidcProviderConfig>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let frontend_origins = parse_origins(
            &env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );

        let mut auth = match env::var("SESSION_SECRET") {
            Ok(secret) => AuthConfig {
                session_secret: parse_session_secret(&secret)?,
                ..AuthConfig::default()
            },
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set, using a random development secret");
                AuthConfig::development()
            }
            Err(_) => bail!("SESSION_SECRET must be set in production"),
        };
        auth.trust_forwarded_for = env::var("TRUST_FORWARDED_FOR")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            port,
            frontend_origins,
            auth,
            google: OidcProviderConfig::google_from_env(),
        })
    }
}

/// Standard base64 encoding of exactly 32 bytes
pub fn parse_session_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

fn parse_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        assert_eq!(parse_session_secret(&encoded).unwrap(), [7u8; 32]);

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(parse_session_secret(&short).is_err());
        assert!(parse_session_secret("not base64!").is_err());
    }

    #[test]
    fn test_parse_origins_skips_invalid() {
        let origins = parse_origins("https://vote.example, http://localhost:5173,\n");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://vote.example");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
