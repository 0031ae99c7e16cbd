//! Identity Middleware
//!
//! Resolves the [`VoterIdentity`] of every request and stores it in the
//! request extensions for downstream handlers.

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use kernel::VoterIdentity;
use platform::client::extract_client_ip;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::ResolveIdentityUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that attaches the caller's identity; never rejects
pub async fn resolve_voter_identity<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(headers, direct_ip, state.config.trust_forwarded_for);

    let token = state.config.cookie_config().read(headers);

    let use_case = ResolveIdentityUseCase::new(state.repo.clone(), state.config.clone());
    let identity: VoterIdentity = use_case.execute(token.as_deref(), client_ip).await;

    req.extensions_mut().insert(identity);

    next.run(req).await
}
