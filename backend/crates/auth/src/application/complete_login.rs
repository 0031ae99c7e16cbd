//! Complete Login Use Case
//!
//! Handles the provider callback. The state check and its consumption
//! happen before any provider call, so a replayed or forged callback
//! never reaches the token endpoint.

use kernel::SubjectId;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::application::session_token::find_session_by_token;
use crate::domain::entity::user::User;
use crate::domain::provider::ProviderRegistry;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Callback parameters as received from the provider redirect
#[derive(Debug, Clone)]
pub struct CompleteLoginInput {
    pub provider: String,
    pub state: String,
    pub code: String,
}

/// Complete login output
#[derive(Debug, Clone)]
pub struct CompleteLoginOutput {
    pub subject_id: SubjectId,
    /// Session expiration (Unix timestamp ms), taken from the ID token
    pub expires_at_ms: i64,
    pub session_remaining_ms: i64,
    /// First login of this subject
    pub user_created: bool,
}

/// Complete login use case
pub struct CompleteLoginUseCase<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
    providers: Arc<ProviderRegistry>,
    config: Arc<AuthConfig>,
}

impl<S, U> CompleteLoginUseCase<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    pub fn new(
        session_repo: Arc<S>,
        user_repo: Arc<U>,
        providers: Arc<ProviderRegistry>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
            providers,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: CompleteLoginInput,
        session_token: Option<&str>,
    ) -> AuthResult<CompleteLoginOutput> {
        let provider = self
            .providers
            .get(&input.provider)
            .ok_or_else(|| AuthError::UnknownProvider(input.provider.clone()))?;

        let mut session = find_session_by_token(
            self.session_repo.as_ref(),
            &self.config.session_secret,
            session_token,
        )
        .await?
        .ok_or(AuthError::ForbiddenState)?;

        let pending = session
            .pending_login
            .clone()
            .ok_or(AuthError::ForbiddenState)?;

        // Compare first so the timing does not depend on the other checks.
        let state_matches = pending.nonce.matches(&input.state);
        if !state_matches || pending.is_expired() || &pending.provider != provider.name() {
            tracing::warn!(
                session_id = %session.session_id,
                provider = %provider.name(),
                state_matches,
                state_expired = pending.is_expired(),
                "Login callback rejected"
            );
            return Err(AuthError::ForbiddenState);
        }

        // Single use: only one concurrent callback gets past this point.
        if !self
            .session_repo
            .consume_state(session.session_id, &pending.nonce)
            .await?
        {
            tracing::warn!(session_id = %session.session_id, "Login state already consumed");
            return Err(AuthError::ForbiddenState);
        }
        session.clear_pending_login();

        // The provider redirects without a code when the user declines.
        if input.code.is_empty() {
            return Err(AuthError::ExchangeFailed("no authorization code returned".to_string()));
        }

        let token = with_timeout(self.config.provider_timeout, provider.exchange(&input.code))
            .await
            .ok_or_else(|| AuthError::ExchangeFailed("token endpoint timed out".to_string()))??;

        let claims = with_timeout(
            self.config.provider_timeout,
            provider.verify_token(&token, &pending.nonce),
        )
        .await
        .ok_or_else(|| AuthError::TokenInvalid("key retrieval timed out".to_string()))??;

        session.authenticate(claims.subject.clone(), claims.expires_at);

        // The session may have been signed out during the provider round trip.
        if !self
            .session_repo
            .authenticate_session(session.session_id, &claims.subject, session.expires_at_ms)
            .await?
        {
            tracing::warn!(session_id = %session.session_id, "Session ended before login completed");
            return Err(AuthError::SessionInvalid);
        }

        let user = User::from_claims(provider.name().clone(), &claims);
        let user_created = self.user_repo.record_login(&user).await?;

        tracing::info!(
            session_id = %session.session_id,
            provider = %provider.name(),
            user_created,
            "Login completed"
        );

        Ok(CompleteLoginOutput {
            subject_id: claims.subject,
            expires_at_ms: session.expires_at_ms,
            session_remaining_ms: session.remaining_ms(),
            user_created,
        })
    }
}

/// `None` when `future` did not finish within `limit`
async fn with_timeout<F: Future>(limit: Duration, future: F) -> Option<F::Output> {
    tokio::time::timeout(limit, future).await.ok()
}
