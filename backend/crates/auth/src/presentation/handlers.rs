//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::VoterIdentity;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CompleteLoginInput, CompleteLoginUseCase, CurrentUserUseCase, InitiateLoginUseCase,
    SignOutUseCase,
};
use crate::domain::provider::ProviderRegistry;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    CallbackQuery, LoginCompletedResponse, LoginUrlResponse, UserInfoResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub providers: Arc<ProviderRegistry>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login
// ============================================================================

/// GET /oauth/{provider}/login
///
/// Redirects (303) to the provider, or returns `{ "url": ... }` when the
/// client accepts JSON.
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let token = state.config.cookie_config().read(&headers);

    let use_case = InitiateLoginUseCase::new(
        state.repo.clone(),
        state.providers.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(&provider, token.as_deref()).await?;

    let mut response = if accepts_json(&headers) {
        Json(LoginUrlResponse {
            url: output.authorization_url,
        })
        .into_response()
    } else {
        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, output.authorization_url)],
        )
            .into_response()
    };

    if let Some(token) = output.session_token {
        let cookie = state
            .config
            .cookie_config()
            .set_cookie_header(&token, Some(output.session_remaining_ms / 1000));
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

/// GET /oauth/{provider}/callback
pub async fn callback<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let cookie_config = state.config.cookie_config();
    let token = cookie_config.read(&headers);

    if let Some(error) = &query.error {
        tracing::info!(provider = %provider, error = %error, "Provider returned an error");
    }

    let use_case = CompleteLoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.providers.clone(),
        state.config.clone(),
    );
    let input = CompleteLoginInput {
        provider,
        state: query.state,
        code: query.code,
    };
    let output = use_case.execute(input, token.as_deref()).await?;

    let mut response = Json(LoginCompletedResponse {
        authenticated: true,
        expires_at_ms: output.expires_at_ms,
        first_login: output.user_created,
    })
    .into_response();

    // Re-issue with a Max-Age matching the new session lifetime
    if let Some(token) = token {
        let cookie =
            cookie_config.set_cookie_header(&token, Some(output.session_remaining_ms / 1000));
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

// ============================================================================
// Sign Out
// ============================================================================

/// ANY /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let cookie_config = state.config.cookie_config();
    let token = cookie_config.read(&headers);

    let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(token.as_deref()).await?;

    let cookie = HeaderValue::from_str(&cookie_config.build_delete_cookie())
        .unwrap_or_else(|_| HeaderValue::from_static(""));

    Ok((StatusCode::ACCEPTED, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/v1/users/me
pub async fn current_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<VoterIdentity>,
) -> AuthResult<Json<UserInfoResponse>>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = CurrentUserUseCase::new(state.repo.clone());
    let user = use_case.execute(&identity).await?;

    Ok(Json(UserInfoResponse::from(user)))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
