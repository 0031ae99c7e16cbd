//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::SubjectId;
use kernel::id::{SessionId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::session::{PendingLogin, Session};
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, provider_name::ProviderName, state_nonce::StateNonce,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn insert_session(&self, session: &Session) -> AuthResult<()> {
        let pending = PendingColumns::from(session);

        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                subject_id,
                oauth_provider,
                oauth_state,
                state_expires_at_ms,
                expires_at_ms,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.subject_id.as_ref().map(SubjectId::as_str))
        .bind(pending.provider)
        .bind(pending.state)
        .bind(pending.expires_at_ms)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                subject_id,
                oauth_provider,
                oauth_state,
                state_expires_at_ms,
                expires_at_ms,
                created_at,
                updated_at
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn save_session(&self, session: &Session) -> AuthResult<()> {
        let pending = PendingColumns::from(session);

        sqlx::query(
            r#"
            UPDATE sessions SET
                subject_id = $2,
                oauth_provider = $3,
                oauth_state = $4,
                state_expires_at_ms = $5,
                expires_at_ms = $6,
                updated_at = $7
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.subject_id.as_ref().map(SubjectId::as_str))
        .bind(pending.provider)
        .bind(pending.state)
        .bind(pending.expires_at_ms)
        .bind(session.expires_at_ms)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn authenticate_session(
        &self,
        session_id: SessionId,
        subject_id: &SubjectId,
        expires_at_ms: i64,
    ) -> AuthResult<bool> {
        // Identity columns only: a login started meanwhile keeps its state.
        let updated = sqlx::query(
            r#"
            UPDATE sessions SET
                subject_id = $2,
                expires_at_ms = $3,
                updated_at = now()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(subject_id.as_str())
        .bind(expires_at_ms)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn consume_state(&self, session_id: SessionId, nonce: &StateNonce) -> AuthResult<bool> {
        // Conditional on the stored value: a second caller finds it gone.
        let consumed = sqlx::query(
            r#"
            UPDATE sessions SET
                oauth_provider = NULL,
                oauth_state = NULL,
                state_expires_at_ms = NULL,
                updated_at = now()
            WHERE session_id = $1 AND oauth_state = $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(nonce.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(consumed == 1)
    }

    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn record_login(&self, user: &User) -> AuthResult<bool> {
        // xmax is 0 only for a freshly inserted tuple
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO users (
                user_id,
                subject_id,
                provider,
                email,
                first_name,
                last_name,
                created_at,
                last_login_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (subject_id) DO UPDATE SET
                last_login_at = EXCLUDED.last_login_at
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.subject_id.as_str())
        .bind(user.provider.as_str())
        .bind(user.email.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_by_subject(&self, subject_id: &SubjectId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                subject_id,
                provider,
                email,
                first_name,
                last_name,
                created_at,
                last_login_at
            FROM users
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

/// Pending login flattened to its three nullable columns
struct PendingColumns<'a> {
    provider: Option<&'a str>,
    state: Option<&'a str>,
    expires_at_ms: Option<i64>,
}

impl<'a> From<&'a Session> for PendingColumns<'a> {
    fn from(session: &'a Session) -> Self {
        match &session.pending_login {
            Some(pending) => Self {
                provider: Some(pending.provider.as_str()),
                state: Some(pending.nonce.as_str()),
                expires_at_ms: Some(pending.expires_at_ms),
            },
            None => Self {
                provider: None,
                state: None,
                expires_at_ms: None,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    subject_id: Option<String>,
    oauth_provider: Option<String>,
    oauth_state: Option<String>,
    state_expires_at_ms: Option<i64>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<Session> {
        let subject_id = self
            .subject_id
            .map(SubjectId::new)
            .transpose()
            .map_err(|e| AuthError::Internal(format!("Invalid subject_id: {}", e)))?;

        let pending_login = match (self.oauth_provider, self.oauth_state, self.state_expires_at_ms) {
            (Some(provider), Some(state), Some(expires_at_ms)) => Some(PendingLogin {
                provider: ProviderName::from_db(provider),
                nonce: StateNonce::from_db(state),
                expires_at_ms,
            }),
            _ => None,
        };

        Ok(Session {
            session_id: SessionId::from_uuid(self.session_id),
            pending_login,
            subject_id,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    subject_id: String,
    provider: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let subject_id = SubjectId::new(self.subject_id)
            .map_err(|e| AuthError::Internal(format!("Invalid subject_id: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            subject_id,
            provider: ProviderName::from_db(self.provider),
            email: Email::from_db(self.email),
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        })
    }
}
