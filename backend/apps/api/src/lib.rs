//! API Application
//!
//! Composes the auth and vote routers into one service. The identity
//! middleware wraps the vote routes so every voting request carries a
//! resolved `VoterIdentity`.

pub mod config;
pub mod health;

use auth::domain::repository::{SessionRepository, UserRepository};
use auth::{AuthConfig, AuthMiddlewareState, ProviderRegistry, auth_router_generic, resolve_voter_identity};
use axum::{Router, middleware};
use std::sync::Arc;
use vote::domain::repository::{PollRepository, VoteRepository};
use vote::{VoteConfig, vote_router_generic};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Build the application router for any repository implementations
pub fn app_router<A, V>(
    auth_repo: A,
    vote_repo: V,
    providers: ProviderRegistry,
    auth_config: AuthConfig,
    vote_config: VoteConfig,
) -> Router
where
    A: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
    V: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let identity_state = AuthMiddlewareState {
        repo: Arc::new(auth_repo.clone()),
        config: Arc::new(auth_config.clone()),
    };

    let votes = vote_router_generic(vote_repo, vote_config).layer(middleware::from_fn_with_state(
        identity_state,
        resolve_voter_identity::<A>,
    ));

    Router::new()
        .merge(auth_router_generic(auth_repo, providers, auth_config))
        .merge(votes)
}
