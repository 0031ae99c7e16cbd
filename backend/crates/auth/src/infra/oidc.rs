//! OpenID Connect Provider
//!
//! [`IdentityProvider`] backed by OIDC discovery. Provider metadata and
//! signing keys are fetched once at start-up and re-fetched when a token
//! fails signature verification, which is how key rotation shows up.

use async_trait::async_trait;
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreIdToken, CoreIdTokenClaims, CoreProviderMetadata,
};
use openidconnect::reqwest::async_http_client;
use openidconnect::{
    AuthorizationCode, ClaimsVerificationError, ClientId, ClientSecret, CsrfToken, IssuerUrl,
    Nonce, RedirectUrl, Scope, TokenResponse,
};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use kernel::SubjectId;

use crate::domain::provider::{IdentityClaims, IdentityProvider, ProviderError, ProviderToken};
use crate::domain::value_object::{
    email::Email, provider_name::ProviderName, state_nonce::StateNonce,
};

/// Google issuer (discovery document at `/.well-known/openid-configuration`)
pub const GOOGLE_ISSUER_URL: &str = "https://accounts.google.com";

/// Registration of this application at an OIDC provider
#[derive(Debug, Clone)]
pub struct OidcProviderConfig {
    pub name: ProviderName,
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Requested in addition to `openid`
    pub scopes: Vec<String>,
}

impl OidcProviderConfig {
    /// Google preset requesting email and profile
    pub fn google(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: ProviderName::from_db("google"),
            issuer_url: GOOGLE_ISSUER_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: vec!["email".to_string(), "profile".to_string()],
        }
    }

    /// Google preset from `GOOGLE_AUTH_CLIENT_ID`, `GOOGLE_AUTH_CLIENT_SECRET`
    /// and `GOOGLE_AUTH_REDIRECT_URI`; `None` unless all three are set
    pub fn google_from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_AUTH_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_AUTH_CLIENT_SECRET").ok()?;
        let redirect_uri = std::env::var("GOOGLE_AUTH_REDIRECT_URI").ok()?;
        Some(Self::google(client_id, client_secret, redirect_uri))
    }
}

/// OIDC identity provider
pub struct OidcProvider {
    config: OidcProviderConfig,
    client: RwLock<Arc<CoreClient>>,
}

impl OidcProvider {
    /// Run discovery and build the client
    pub async fn discover(config: OidcProviderConfig) -> Result<Self, ProviderError> {
        let client = Self::discover_client(&config).await?;
        tracing::info!(
            provider = %config.name,
            issuer = %config.issuer_url,
            "OIDC provider discovered"
        );

        Ok(Self {
            config,
            client: RwLock::new(Arc::new(client)),
        })
    }

    async fn discover_client(config: &OidcProviderConfig) -> Result<CoreClient, ProviderError> {
        let issuer = IssuerUrl::new(config.issuer_url.clone())
            .map_err(|e| ProviderError::Discovery(format!("invalid issuer URL: {e}")))?;
        let redirect = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| ProviderError::Discovery(format!("invalid redirect URI: {e}")))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, async_http_client)
            .await
            .map_err(|e| ProviderError::Discovery(e.to_string()))?;

        Ok(CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
        )
        .set_redirect_uri(redirect))
    }

    fn client(&self) -> Arc<CoreClient> {
        match self.client.read() {
            Ok(client) => Arc::clone(&*client),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Re-run discovery to pick up rotated signing keys
    async fn refresh(&self) -> Result<Arc<CoreClient>, ProviderError> {
        let client = Arc::new(Self::discover_client(&self.config).await?);
        match self.client.write() {
            Ok(mut slot) => *slot = Arc::clone(&client),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&client),
        }

        tracing::info!(provider = %self.config.name, "OIDC signing keys refreshed");
        Ok(client)
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn name(&self) -> &ProviderName {
        &self.config.name
    }

    fn authorization_url(&self, state: &StateNonce) -> Result<String, ProviderError> {
        let csrf = state.as_str().to_string();
        let nonce = state.as_str().to_string();
        let client = self.client();

        let mut request = client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || CsrfToken::new(csrf),
            move || Nonce::new(nonce),
        );
        for scope in &self.config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (url, _, _) = request.url();
        Ok(url.to_string())
    }

    async fn exchange(&self, code: &str) -> Result<ProviderToken, ProviderError> {
        let client = self.client();

        let response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| ProviderError::Exchange(e.to_string()))?;

        let id_token = response
            .id_token()
            .ok_or_else(|| ProviderError::Exchange("token response has no id_token".to_string()))?;

        Ok(ProviderToken::new(id_token.to_string()))
    }

    async fn verify_token(
        &self,
        token: &ProviderToken,
        nonce: &StateNonce,
    ) -> Result<IdentityClaims, ProviderError> {
        let id_token = CoreIdToken::from_str(token.id_token())
            .map_err(|e| ProviderError::Verification(format!("malformed ID token: {e}")))?;
        let expected_nonce = Nonce::new(nonce.as_str().to_string());

        let first_attempt = verified_claims(&self.client(), &id_token, &expected_nonce);
        let claims = match first_attempt {
            Err(ClaimsVerificationError::SignatureVerification(e)) => {
                tracing::debug!(error = %e, "ID token signature rejected, refreshing keys");
                let client = self.refresh().await?;
                verified_claims(&client, &id_token, &expected_nonce)
            }
            other => other,
        }
        .map_err(|e| ProviderError::Verification(e.to_string()))?;

        identity_claims(&claims)
    }
}

fn verified_claims(
    client: &CoreClient,
    id_token: &CoreIdToken,
    nonce: &Nonce,
) -> Result<CoreIdTokenClaims, ClaimsVerificationError> {
    id_token
        .claims(&client.id_token_verifier(), nonce)
        .cloned()
}

fn identity_claims(claims: &CoreIdTokenClaims) -> Result<IdentityClaims, ProviderError> {
    let subject =
        SubjectId::new(claims.subject().as_str()).map_err(|_| ProviderError::MissingClaim("sub"))?;
    let email = claims
        .email()
        .ok_or(ProviderError::MissingClaim("email"))?;
    let email = Email::new(email.as_str())
        .map_err(|_| ProviderError::Verification("malformed email claim".to_string()))?;

    Ok(IdentityClaims {
        subject,
        email,
        expires_at: claims.expiration(),
        first_name: claims
            .given_name()
            .and_then(|name| name.get(None))
            .map(|name| name.as_str().to_string()),
        last_name: claims
            .family_name()
            .and_then(|name| name.get(None))
            .map(|name| name.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_preset() {
        let config = OidcProviderConfig::google("id", "secret", "https://vote.example/cb");
        assert_eq!(config.name.as_str(), "google");
        assert_eq!(config.issuer_url, GOOGLE_ISSUER_URL);
        assert_eq!(config.scopes, vec!["email", "profile"]);
    }

    #[tokio::test]
    async fn test_discover_rejects_bad_issuer() {
        let config = OidcProviderConfig {
            issuer_url: "not a url".to_string(),
            ..OidcProviderConfig::google("id", "secret", "https://vote.example/cb")
        };
        let result = OidcProvider::discover(config).await;
        assert!(matches!(result, Err(ProviderError::Discovery(_))));
    }
}
