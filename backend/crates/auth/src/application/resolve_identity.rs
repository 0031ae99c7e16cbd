//! Resolve Identity Use Case
//!
//! Decides who is acting on a request. Never fails: any problem with the
//! session (missing, forged, expired, unreadable store) degrades to the
//! pseudonymous identity derived from the client address.

use kernel::{PseudonymousKey, SubjectId, VoterIdentity};
use platform::client::address_digest;
use std::net::IpAddr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::repository::SessionRepository;

/// Resolve identity use case
pub struct ResolveIdentityUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> ResolveIdentityUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Read-only: the session is never created, extended or modified
    pub async fn execute(&self, session_token: Option<&str>, client_ip: Option<IpAddr>) -> VoterIdentity {
        match self.authenticated_subject(session_token).await {
            Some(subject) => VoterIdentity::Authenticated(subject),
            None => VoterIdentity::Pseudonymous(PseudonymousKey::from_hex_digest(address_digest(
                client_ip,
            ))),
        }
    }

    async fn authenticated_subject(&self, session_token: Option<&str>) -> Option<SubjectId> {
        let session_id = parse_session_token(&self.config.session_secret, session_token?)?;

        match self.session_repo.find_session(session_id).await {
            Ok(Some(session)) => session.authenticated_subject().cloned(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    session_id = %session_id,
                    "Session store unavailable, treating request as anonymous"
                );
                None
            }
        }
    }
}
