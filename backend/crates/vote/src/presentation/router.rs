//! Vote Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::VoteConfig;
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::infra::postgres::PgVoteRepository;
use crate::presentation::handlers::{self, VoteAppState};

/// Create the Vote router with PostgreSQL repository
pub fn vote_router(repo: PgVoteRepository, config: VoteConfig) -> Router {
    vote_router_generic(repo, config)
}

/// Create a generic Vote router for any repository implementation
///
/// Expects a `VoterIdentity` request extension on every request.
pub fn vote_router_generic<R>(repo: R, config: VoteConfig) -> Router
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let state = VoteAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/api/v1/polls",
            get(handlers::list_polls::<R>).post(handlers::create_poll::<R>),
        )
        .route(
            "/api/v1/polls/{id}",
            get(handlers::get_poll::<R>).delete(handlers::delete_poll::<R>),
        )
        .route("/api/v1/polls/{id}/vote", post(handlers::cast_vote::<R>))
        .route("/api/v1/polls/{id}/votes", get(handlers::list_votes::<R>))
        .with_state(state)
}
