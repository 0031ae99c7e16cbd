//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::SubjectId;
use kernel::id::SessionId;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::state_nonce::StateNonce;
use crate::error::AuthResult;

/// Session store
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn insert_session(&self, session: &Session) -> AuthResult<()>;

    /// Find a live session; expired sessions are reported as absent
    async fn find_session(&self, session_id: SessionId) -> AuthResult<Option<Session>>;

    /// Persist every field of an existing session
    async fn save_session(&self, session: &Session) -> AuthResult<()>;

    /// Bind a session to a verified subject, leaving any pending login alone
    ///
    /// Returns `false` when the session no longer exists.
    async fn authenticate_session(
        &self,
        session_id: SessionId,
        subject_id: &SubjectId,
        expires_at_ms: i64,
    ) -> AuthResult<bool>;

    /// Clear the pending login if it still holds `nonce`
    ///
    /// Atomic: of any number of concurrent callers presenting the same
    /// nonce, exactly one gets `true`.
    async fn consume_state(&self, session_id: SessionId, nonce: &StateNonce) -> AuthResult<bool>;

    /// Delete a session
    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// User store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create the user on first login, otherwise only bump `last_login_at`
    ///
    /// Returns `true` when a row was created.
    async fn record_login(&self, user: &User) -> AuthResult<bool>;

    /// Find user by provider subject
    async fn find_by_subject(&self, subject_id: &SubjectId) -> AuthResult<Option<User>>;
}
