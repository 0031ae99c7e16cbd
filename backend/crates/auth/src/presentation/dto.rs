//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Login
// ============================================================================

/// Authorization URL, for clients that ask for JSON instead of a redirect
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlResponse {
    pub url: String,
}

/// Query string of the provider redirect back to us
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: String,
    /// Set by the provider when the user declined
    pub error: Option<String>,
}

/// Login completed response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCompletedResponse {
    pub authenticated: bool,
    pub expires_at_ms: i64,
    pub first_login: bool,
}

// ============================================================================
// User Info (for authenticated users)
// ============================================================================

/// Current user info response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_id: String,
    pub provider: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub created_at_ms: i64,
    pub last_login_at_ms: i64,
}

impl From<User> for UserInfoResponse {
    fn from(user: User) -> Self {
        Self {
            display_name: user.display_name(),
            user_id: user.user_id.to_string(),
            provider: user.provider.as_str().to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            created_at_ms: user.created_at.timestamp_millis(),
            last_login_at_ms: user.last_login_at.timestamp_millis(),
        }
    }
}
