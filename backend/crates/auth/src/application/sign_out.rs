//! Sign Out Use Case
//!
//! Destroys the caller's session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Sign out from current session
    ///
    /// A missing or unverifiable token has nothing to destroy and succeeds.
    pub async fn execute(&self, session_token: Option<&str>) -> AuthResult<()> {
        let Some(session_id) =
            session_token.and_then(|t| parse_session_token(&self.config.session_secret, t))
        else {
            return Ok(());
        };

        self.session_repo.delete_session(session_id).await?;

        tracing::info!(session_id = %session_id, "Session destroyed");
        Ok(())
    }
}
