//! Session Entity
//!
//! Server-side browser session. Carries the pending login state while an
//! authorization redirect is in flight, and the authenticated subject
//! once the callback has completed. The cookie only holds a signed
//! reference to the session ID.

use chrono::{DateTime, Duration, Utc};
use kernel::SubjectId;
use kernel::id::SessionId;

use crate::domain::value_object::{provider_name::ProviderName, state_nonce::StateNonce};

/// Login in flight: issued by initiate, consumed by the first valid callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    pub provider: ProviderName,
    pub nonce: StateNonce,
    /// State expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl PendingLogin {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    pub pending_login: Option<PendingLogin>,
    /// Set only after a successful callback
    pub subject_id: Option<SubjectId>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            pending_login: None,
            subject_id: None,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }

    /// Store a new pending login, replacing any previous one
    ///
    /// An anonymous session that would expire before the state does is
    /// extended so the callback can still find it.
    pub fn begin_login(&mut self, provider: ProviderName, nonce: StateNonce, state_ttl: Duration) {
        let now = Utc::now();
        let state_expires_at_ms = (now + state_ttl).timestamp_millis();

        self.pending_login = Some(PendingLogin {
            provider,
            nonce,
            expires_at_ms: state_expires_at_ms,
        });
        if self.subject_id.is_none() && self.expires_at_ms < state_expires_at_ms {
            self.expires_at_ms = state_expires_at_ms;
        }
        self.updated_at = now;
    }

    pub fn clear_pending_login(&mut self) {
        self.pending_login = None;
        self.updated_at = Utc::now();
    }

    /// Bind the session to a verified subject until `expires_at`
    pub fn authenticate(&mut self, subject_id: SubjectId, expires_at: DateTime<Utc>) {
        self.subject_id = Some(subject_id);
        self.expires_at_ms = expires_at.timestamp_millis();
        self.pending_login = None;
        self.updated_at = Utc::now();
    }

    /// Subject of a live authenticated session
    pub fn authenticated_subject(&self) -> Option<&SubjectId> {
        if self.is_expired() {
            return None;
        }
        self.subject_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> ProviderName {
        ProviderName::new("google").unwrap()
    }

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new(Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.authenticated_subject().is_none());
        assert!(session.pending_login.is_none());
        assert!(session.remaining_ms() > 0);
    }

    #[test]
    fn test_begin_login_replaces_previous_state() {
        let mut session = Session::new(Duration::hours(1));
        let first = StateNonce::generate(&google());
        let second = StateNonce::generate(&google());

        session.begin_login(google(), first.clone(), Duration::minutes(10));
        session.begin_login(google(), second.clone(), Duration::minutes(10));

        let pending = session.pending_login.as_ref().unwrap();
        assert_eq!(pending.nonce, second);
        assert!(!pending.is_expired());
    }

    #[test]
    fn test_begin_login_extends_short_anonymous_session() {
        let mut session = Session::new(Duration::seconds(1));
        session.begin_login(google(), StateNonce::generate(&google()), Duration::minutes(10));
        assert!(session.remaining_ms() > 60_000);
    }

    #[test]
    fn test_authenticate() {
        let mut session = Session::new(Duration::hours(1));
        session.begin_login(google(), StateNonce::generate(&google()), Duration::minutes(10));

        let subject = SubjectId::new("1234567890").unwrap();
        session.authenticate(subject.clone(), Utc::now() + Duration::hours(1));

        assert_eq!(session.authenticated_subject(), Some(&subject));
        assert!(session.pending_login.is_none());
    }

    #[test]
    fn test_expired_session_has_no_subject() {
        let mut session = Session::new(Duration::hours(1));
        session.authenticate(
            SubjectId::new("1234567890").unwrap(),
            Utc::now() - Duration::seconds(1),
        );
        assert!(session.is_expired());
        assert!(session.authenticated_subject().is_none());
    }
}
