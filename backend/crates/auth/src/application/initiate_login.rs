//! Initiate Login Use Case
//!
//! Starts an authorization code flow: stores a fresh state nonce in the
//! caller's session (creating one if needed) and hands back the provider
//! redirect URL.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::{find_session_by_token, issue_session_token};
use crate::domain::entity::session::Session;
use crate::domain::provider::ProviderRegistry;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::state_nonce::StateNonce;
use crate::error::{AuthError, AuthResult};

/// Initiate login output
#[derive(Debug)]
pub struct InitiateLoginOutput {
    /// Provider authorization endpoint to redirect the browser to
    pub authorization_url: String,
    /// Cookie token to set; `None` when the caller's session was reused
    pub session_token: Option<String>,
    /// Remaining session lifetime, for the cookie Max-Age
    pub session_remaining_ms: i64,
}

/// Initiate login use case
pub struct InitiateLoginUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    providers: Arc<ProviderRegistry>,
    config: Arc<AuthConfig>,
}

impl<S> InitiateLoginUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, providers: Arc<ProviderRegistry>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            providers,
            config,
        }
    }

    pub async fn execute(
        &self,
        provider_name: &str,
        session_token: Option<&str>,
    ) -> AuthResult<InitiateLoginOutput> {
        let provider = self
            .providers
            .get(provider_name)
            .ok_or_else(|| AuthError::UnknownProvider(provider_name.to_string()))?;

        let existing = find_session_by_token(
            self.session_repo.as_ref(),
            &self.config.session_secret,
            session_token,
        )
        .await?;
        let is_new = existing.is_none();
        let mut session = match existing {
            Some(session) => session,
            None => Session::new(self.config.anonymous_session_ttl()?),
        };

        let nonce = StateNonce::generate(provider.name());
        let authorization_url = provider.authorization_url(&nonce)?;

        session.begin_login(provider.name().clone(), nonce, self.config.state_ttl()?);
        if is_new {
            self.session_repo.insert_session(&session).await?;
        } else {
            self.session_repo.save_session(&session).await?;
        }

        tracing::debug!(
            session_id = %session.session_id,
            provider = %provider.name(),
            new_session = is_new,
            "Login initiated"
        );

        Ok(InitiateLoginOutput {
            authorization_url,
            session_token: is_new
                .then(|| issue_session_token(&self.config.session_secret, &session.session_id)),
            session_remaining_ms: session.remaining_ms(),
        })
    }
}
