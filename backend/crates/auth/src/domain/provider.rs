//! Identity Provider Port
//!
//! An external OpenID Connect provider: builds the authorization
//! redirect, exchanges the returned code and verifies the ID token.
//! Providers are registered by name and looked up per request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel::SubjectId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::value_object::{email::Email, provider_name::ProviderName, state_nonce::StateNonce};

/// Provider failure, split by where it happened
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Provider metadata or signing keys could not be fetched
    #[error("provider discovery failed: {0}")]
    Discovery(String),

    /// Network or protocol failure while redeeming the code
    #[error("code exchange failed: {0}")]
    Exchange(String),

    /// Signature, issuer, audience, expiry or nonce check failed
    #[error("token verification failed: {0}")]
    Verification(String),

    /// Token verified but lacks a claim the login needs
    #[error("required claim missing: {0}")]
    MissingClaim(&'static str),
}

/// Token material returned by a successful code exchange
#[derive(Clone)]
pub struct ProviderToken {
    id_token: String,
}

impl ProviderToken {
    pub fn new(id_token: impl Into<String>) -> Self {
        Self {
            id_token: id_token.into(),
        }
    }

    /// Raw compact-serialized ID token
    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

impl fmt::Debug for ProviderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderToken(..)")
    }
}

/// Claims extracted from a verified ID token
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub subject: SubjectId,
    pub email: Email,
    /// Token expiry; bounds the authenticated session
    pub expires_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &ProviderName;

    /// Authorization endpoint URL carrying `state` as both the OAuth
    /// `state` parameter and the OIDC `nonce`
    fn authorization_url(&self, state: &StateNonce) -> Result<String, ProviderError>;

    /// Redeem an authorization code at the token endpoint
    async fn exchange(&self, code: &str) -> Result<ProviderToken, ProviderError>;

    /// Verify the ID token and check it echoes `nonce`
    async fn verify_token(
        &self,
        token: &ProviderToken,
        nonce: &StateNonce,
    ) -> Result<IdentityClaims, ProviderError>;
}

/// Registered providers, keyed by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; a later registration under the same name wins
    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) {
        let name = provider.name().as_str().to_string();
        tracing::info!(provider = %name, "Identity provider registered");
        self.providers.insert(name, provider);
    }

    pub fn with(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
