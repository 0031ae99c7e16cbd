//! Auth Router

use axum::{
    Router, middleware,
    routing::{any, get},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::provider::ProviderRegistry;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, resolve_voter_identity};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(
    repo: PgAuthRepository,
    providers: ProviderRegistry,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, providers, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, providers: ProviderRegistry, config: AuthConfig) -> Router
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        providers: Arc::new(providers),
        config: Arc::new(config),
    };
    let identity_state = AuthMiddlewareState {
        repo: state.repo.clone(),
        config: state.config.clone(),
    };

    let me = Router::new()
        .route("/api/v1/users/me", get(handlers::current_user::<R>))
        .route_layer(middleware::from_fn_with_state(
            identity_state,
            resolve_voter_identity::<R>,
        ));

    Router::new()
        .route("/oauth/{provider}/login", get(handlers::login::<R>))
        .route("/oauth/{provider}/callback", get(handlers::callback::<R>))
        .route("/logout", any(handlers::logout::<R>))
        .merge(me)
        .with_state(state)
}
