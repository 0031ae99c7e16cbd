//! Session Token
//!
//! Cookie value referencing a server-side session:
//! `<session uuid>.<base64url HMAC-SHA256(session uuid)>`.

use kernel::id::SessionId;
use platform::crypto::{sign, verify_signature};

use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Issue the cookie token for a session
pub fn issue_session_token(secret: &[u8; 32], session_id: &SessionId) -> String {
    let id = session_id.to_string();
    let signature = sign(secret, id.as_bytes());
    format!("{}.{}", id, signature)
}

/// Parse and verify a cookie token
///
/// `None` for anything malformed or signed with another key.
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> Option<SessionId> {
    let (id, signature) = token.split_once('.')?;
    if !verify_signature(secret, id.as_bytes(), signature) {
        return None;
    }
    id.parse().ok()
}

/// Look up the live session a cookie token points at
pub(crate) async fn find_session_by_token<S>(
    repo: &S,
    secret: &[u8; 32],
    token: Option<&str>,
) -> AuthResult<Option<Session>>
where
    S: SessionRepository,
{
    let Some(session_id) = token.and_then(|t| parse_session_token(secret, t)) else {
        return Ok(None);
    };
    repo.find_session(session_id).await
}
