//! In-Memory Implementations
//!
//! Process-local session/user store and a scripted identity provider.
//! Used by tests and local runs without a database or a real provider.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use kernel::SubjectId;
use kernel::id::SessionId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::provider::{IdentityClaims, IdentityProvider, ProviderError, ProviderToken};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, provider_name::ProviderName, state_nonce::StateNonce,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct MemoryAuthState {
    sessions: HashMap<SessionId, Session>,
    users: HashMap<SubjectId, User>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<Mutex<MemoryAuthState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail like an unreachable database
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Raw session lookup, ignoring expiry
    pub fn session(&self, session_id: SessionId) -> Option<Session> {
        self.lock().ok()?.sessions.get(&session_id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.lock().map(|s| s.sessions.len()).unwrap_or(0)
    }

    pub fn user_count(&self) -> usize {
        self.lock().map(|s| s.users.len()).unwrap_or(0)
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, MemoryAuthState>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
        }
        self.state
            .lock()
            .map_err(|_| AuthError::Internal("auth store lock poisoned".to_string()))
    }
}

impl SessionRepository for MemoryAuthRepository {
    async fn insert_session(&self, session: &Session) -> AuthResult<()> {
        self.lock()?
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        Ok(self
            .lock()?
            .sessions
            .get(&session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    async fn save_session(&self, session: &Session) -> AuthResult<()> {
        let mut state = self.lock()?;
        if let Some(stored) = state.sessions.get_mut(&session.session_id) {
            *stored = session.clone();
        }
        Ok(())
    }

    async fn authenticate_session(
        &self,
        session_id: SessionId,
        subject_id: &SubjectId,
        expires_at_ms: i64,
    ) -> AuthResult<bool> {
        let mut state = self.lock()?;
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return Ok(false);
        };

        session.subject_id = Some(subject_id.clone());
        session.expires_at_ms = expires_at_ms;
        session.updated_at = Utc::now();
        Ok(true)
    }

    async fn consume_state(&self, session_id: SessionId, nonce: &StateNonce) -> AuthResult<bool> {
        let mut state = self.lock()?;
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return Ok(false);
        };

        let holds_nonce = session
            .pending_login
            .as_ref()
            .is_some_and(|pending| pending.nonce.as_str() == nonce.as_str());
        if holds_nonce {
            session.clear_pending_login();
        }
        Ok(holds_nonce)
    }

    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()> {
        self.lock()?.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut state = self.lock()?;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired());
        Ok((before - state.sessions.len()) as u64)
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn record_login(&self, user: &User) -> AuthResult<bool> {
        let mut state = self.lock()?;
        match state.users.get_mut(&user.subject_id) {
            Some(existing) => {
                existing.last_login_at = user.last_login_at;
                Ok(false)
            }
            None => {
                state.users.insert(user.subject_id.clone(), user.clone());
                Ok(true)
            }
        }
    }

    async fn find_by_subject(&self, subject_id: &SubjectId) -> AuthResult<Option<User>> {
        Ok(self.lock()?.users.get(subject_id).cloned())
    }
}

// ============================================================================
// Scripted Identity Provider
// ============================================================================

/// Identity provider that accepts one authorization code
///
/// Every successful exchange yields the configured claims.
pub struct ScriptedProvider {
    name: ProviderName,
    valid_code: String,
    claims: IdentityClaims,
    exchange_delay: Duration,
    reject_tokens: bool,
    exchanges: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &str, valid_code: &str, claims: IdentityClaims) -> Self {
        Self {
            name: ProviderName::from_db(name),
            valid_code: valid_code.to_string(),
            claims,
            exchange_delay: Duration::ZERO,
            reject_tokens: false,
            exchanges: AtomicUsize::new(0),
        }
    }

    /// Stall every exchange, to exercise provider timeouts
    pub fn with_exchange_delay(mut self, delay: Duration) -> Self {
        self.exchange_delay = delay;
        self
    }

    /// Fail every token verification
    pub fn rejecting_tokens(mut self) -> Self {
        self.reject_tokens = true;
        self
    }

    /// Number of exchange calls that reached the provider
    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    fn name(&self) -> &ProviderName {
        &self.name
    }

    fn authorization_url(&self, state: &StateNonce) -> Result<String, ProviderError> {
        Ok(format!(
            "https://idp.test/{}/authorize?response_type=code&scope=openid+email+profile&state={}&nonce={}",
            self.name,
            state.as_str(),
            state.as_str()
        ))
    }

    async fn exchange(&self, code: &str) -> Result<ProviderToken, ProviderError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if !self.exchange_delay.is_zero() {
            tokio::time::sleep(self.exchange_delay).await;
        }
        if code != self.valid_code {
            return Err(ProviderError::Exchange("invalid_grant".to_string()));
        }
        Ok(ProviderToken::new(format!("scripted.{}", code)))
    }

    async fn verify_token(
        &self,
        _token: &ProviderToken,
        _nonce: &StateNonce,
    ) -> Result<IdentityClaims, ProviderError> {
        if self.reject_tokens {
            return Err(ProviderError::Verification("signature mismatch".to_string()));
        }
        Ok(self.claims.clone())
    }
}

/// Claims for a subject with a one-hour token
///
/// Panics on an empty `subject`; test fixture only.
pub fn sample_claims(subject: &str, email: &str) -> IdentityClaims {
    IdentityClaims {
        subject: SubjectId::new(subject).expect("sample subject must be non-empty"),
        email: Email::from_db(email),
        expires_at: Utc::now() + ChronoDuration::hours(1),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
    }
}
